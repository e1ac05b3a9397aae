//! phylo2vec command line: convert between vectors, matrices and Newick strings.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
use phylo2vec::LeafLabelMap;
use phylo2vec::model::{Ancestry, cophenetic_distances};
use phylo2vec::newick::utils::apply_label_mapping;
use phylo2vec::newick::{
    NewickDialect, NewickWriter, parse_matrix, parse_taxa_matrix, parse_taxa_vector, parse_vector,
    write_vector,
};

#[derive(Parser)]
#[command(name = "phylo2vec", version, about = "Encode binary trees as integer vectors and back")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a comma separated vector (e.g. 0,1,4) into a Newick string
    ToNewick {
        vector: String,
        /// Omit parent labels
        #[arg(long)]
        no_parents: bool,
    },
    /// Encode an integer Newick string into a vector
    ToVector {
        newick: String,
        /// The string has no parent labels
        #[arg(long)]
        no_parents: bool,
        /// Leaves carry taxon labels; print the label of each leaf id as well
        #[arg(long)]
        with_mapping: bool,
    },
    /// Encode a Newick string with branch lengths into a matrix (one row per line)
    ToMatrix {
        newick: String,
        /// The string has no parent labels
        #[arg(long)]
        no_parents: bool,
        /// Leaves carry taxon labels; print the label of each leaf id as well
        #[arg(long)]
        with_mapping: bool,
    },
    /// Print the cophenetic distances (edge counts) between the leaves of a vector's tree
    Cophenetic { vector: String },
    /// Replace integer leaves by taxon labels given in leaf id order
    ApplyLabels {
        newick: String,
        /// Comma separated taxon labels, the i-th belonging to leaf i
        labels: String,
    },
}

fn dialect(no_parents: bool) -> NewickDialect {
    if no_parents {
        NewickDialect::new()
    } else {
        NewickDialect::new().with_parent_labels()
    }
}

fn parse_vector_arg(vector: &str) -> Result<Vec<usize>> {
    vector
        .split(',')
        .map(|x| {
            x.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid vector element {x:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();

    match cli.command {
        Command::ToNewick { vector, no_parents } => {
            let v = parse_vector_arg(&vector)?;
            let writer = if no_parents {
                NewickWriter::new().without_parent_labels()
            } else {
                NewickWriter::new()
            };
            println!("{}", write_vector(&v, &writer)?);
        }
        Command::ToVector { newick, no_parents, with_mapping } => {
            if with_mapping {
                let (v, labels) = parse_taxa_vector(&newick)
                    .context("failed to encode tree with taxon labels")?;
                info!("Mapped {} taxa", labels.num_labels());
                println!("{}", join(&v, ","));
                print!("{labels}");
            } else {
                let v = parse_vector(&newick, dialect(no_parents))?;
                println!("{}", join(&v, ","));
            }
        }
        Command::ToMatrix { newick, no_parents, with_mapping } => {
            let (matrix, labels) = if with_mapping {
                let (matrix, labels) = parse_taxa_matrix(&newick)
                    .context("failed to encode tree with taxon labels")?;
                info!("Mapped {} taxa", labels.num_labels());
                (matrix, Some(labels))
            } else {
                (parse_matrix(&newick, dialect(no_parents))?, None)
            };
            for (v_i, [length1, length2]) in matrix.rows() {
                println!("{v_i}\t{length1}\t{length2}");
            }
            if let Some(labels) = labels {
                print!("{labels}");
            }
        }
        Command::Cophenetic { vector } => {
            let ancestry = Ancestry::from_vector(&parse_vector_arg(&vector)?)?;
            for row in cophenetic_distances(&ancestry) {
                println!("{}", join(&row, "\t"));
            }
        }
        Command::ApplyLabels { newick, labels } => {
            let labels: Vec<&str> = labels.split(',').map(str::trim).collect();
            let mut map = LeafLabelMap::new(labels.len());
            for label in labels {
                if map.contains_label(label) {
                    bail!("duplicate taxon label {label:?}");
                }
                map.get_or_insert(label);
            }
            println!("{}", apply_label_mapping(&newick, &map)?);
        }
    }

    Ok(())
}

fn join(v: &[usize], separator: &str) -> String {
    v.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
