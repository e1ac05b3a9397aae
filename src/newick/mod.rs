//! Newick side of the codec: reading integer Newick strings into vectors
//! and writing vectors back.
//!
//! # Encoding pipeline
//! 1. [extract_cherries] scans the string into unordered [Cherry]s.
//! 2. [canonical] rewrites them into creation order with leaf-only children.
//! 3. [vector_builder] turns them into the Phylo2Vec vector.
//!
//! Decoding expands the vector into an [Ancestry] and renders it with a
//! [NewickWriter].
//!
//! # Quick API
//! * [parse_vector] - Newick string of any dialect to vector
//! * [parse_matrix] - Newick string with branch lengths to [Phylo2Mat]
//! * [write_vector] - vector to Newick string
//! * [write_matrix] - [Phylo2Mat] to Newick string
//! * [parse_taxa_vector], [parse_taxa_matrix] - Newick string with taxon
//!   labels to vector or [Phylo2Mat] plus the [LeafLabelMap] of its leaves
//!
//! # Format
//! Integer Newick strings follow this grammar:
//! * `tree ::= subtree ';'`
//! * `subtree ::= leaf | '(' subtree ',' subtree ')' [parent_label] [':' length]`
//! * `leaf ::= digits [':' length]`
//! * `parent_label ::= digits`
//! * `length ::= signed decimal (scientific notation allowed)`
//!
//! Furthermore:
//! * Leaves of a tree with `n` leaves are exactly `0..n`
//! * Parent labels are optional as a whole (see [NewickDialect]); if present
//!   they are unique, at least `n`, and each is larger than the labels
//!   below it
//! * Whitespace can occur between tokens, but not within them
//!
//! Strings with taxon labels can be converted with [utils::create_label_mapping]
//! and [utils::apply_label_mapping].

pub mod canonical;
pub mod cherries;
mod defs;
pub mod fenwick;
pub mod utils;
pub mod vector_builder;
pub mod writer;

pub use self::cherries::{Cherry, ExtractedCherries, NewickDialect, extract_cherries};
pub use self::defs::DEFAULT_BRANCH_LENGTH_PRECISION;
pub use self::writer::NewickWriter;

use crate::error::Result;
use crate::model::ancestry::Ancestry;
use crate::model::leaf_label_map::LeafLabelMap;
use crate::model::matrix::{Phylo2Mat, validate_matrix};
use crate::newick::canonical::canonical_order;
use crate::newick::utils::{create_label_mapping, remove_branch_lengths};
use crate::newick::vector_builder::build_vector;
use crate::parser::byte_parser::ByteParser;
use log::debug;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Encodes a Newick string of the given dialect as Phylo2Vec vector.
///
/// Branch lengths (if the dialect has them) are read and discarded.
///
/// # Cost
/// Extraction and vector building take `O(n log n)` for `n` leaves;
/// bringing the cherries into creation order takes `O(n^2)` for both
/// dialects (see [canonical_order]).
///
/// # Arguments
/// * `newick` - Integer Newick string
/// * `dialect` - [NewickDialect] of the string
///
/// # Returns
/// * `Ok(Vec<usize>)` - The vector of the tree
/// * [MalformedNewick](crate::Phylo2VecError::MalformedNewick) - If the
///   string is not a valid tree of the dialect
///
/// # Example
/// ```
/// use phylo2vec::newick::{parse_vector, NewickDialect};
///
/// let v = parse_vector("((0,(1,2)),3);", NewickDialect::new()).unwrap();
/// assert_eq!(v, vec![0, 1, 4]);
/// ```
pub fn parse_vector(newick: &str, dialect: NewickDialect) -> Result<Vec<usize>> {
    let mut parser = ByteParser::for_str(newick);
    let extracted = extract_cherries(&mut parser, dialect)?;
    debug!(
        "Encoding tree with {} leaves ({dialect})",
        extracted.num_leaves
    );

    let (ordered, _) = canonical_order(&extracted.cherries, dialect.parent_labels())?;
    Ok(build_vector(&ordered))
}

/// Encodes a Newick string with branch lengths as [Phylo2Mat].
///
/// The dialect is read with branch lengths, whether or not `dialect`
/// asks for them. Branch length pairs follow their cherries into
/// creation order and are oriented like the decoded tree: the length of
/// the child holding the smaller leaf comes first.
///
/// # Errors
/// * [MalformedNewick](crate::Phylo2VecError::MalformedNewick) - If the
///   string is not a valid tree of the dialect
/// * [InvalidMatrix](crate::Phylo2VecError::InvalidMatrix) - If a
///   non-root branch length is not finite and strictly positive, so that
///   every parsed matrix can be written again
///
/// # Example
/// ```
/// use phylo2vec::newick::{parse_matrix, NewickDialect};
///
/// let dialect = NewickDialect::new().with_parent_labels();
/// let m = parse_matrix("((0:0.1,2:0.2)3:0.3,1:0.4)4;", dialect).unwrap();
/// assert_eq!(m.vector, vec![0, 0]);
/// assert_eq!(m.branch_lengths, vec![[0.1, 0.2], [0.3, 0.4]]);
/// ```
pub fn parse_matrix(newick: &str, dialect: NewickDialect) -> Result<Phylo2Mat> {
    let dialect = dialect.with_branch_lengths();
    let mut parser = ByteParser::for_str(newick);
    let extracted = extract_cherries(&mut parser, dialect)?;
    debug!(
        "Encoding tree with {} leaves and branch lengths ({dialect})",
        extracted.num_leaves
    );

    let (ordered, order) = canonical_order(&extracted.cherries, dialect.parent_labels())?;
    let branch_lengths: Vec<_> = ordered
        .iter()
        .zip(&order)
        .map(|(cherry, &i)| {
            let [length1, length2] = extracted.branch_lengths[i];
            if cherry.child1 < cherry.child2 {
                [length1, length2]
            } else {
                [length2, length1]
            }
        })
        .collect();

    let vector = build_vector(&ordered);
    validate_matrix(&vector, &branch_lengths)?;
    Ok(Phylo2Mat::new(vector, branch_lengths))
}

/// Encodes a Newick string with taxon labels as Phylo2Vec vector.
///
/// Leaves are numbered in order of appearance (see
/// [create_label_mapping](utils::create_label_mapping)). Internal labels
/// and branch lengths are ignored.
///
/// # Returns
/// * `Ok((Vec<usize>, LeafLabelMap))` - The vector and the taxon label of
///   every leaf id
/// * [MalformedNewick](crate::Phylo2VecError::MalformedNewick) - If labels
///   are missing or repeated, or the string is not a rooted binary tree
///
/// # Example
/// ```
/// use phylo2vec::newick::parse_taxa_vector;
///
/// let (v, labels) = parse_taxa_vector("((Kea:1,Kakapo:2):1,Kaka:3);").unwrap();
/// assert_eq!(v, vec![0, 0]);
/// assert_eq!(labels.get_label(1), Some("Kakapo"));
/// ```
pub fn parse_taxa_vector(newick: &str) -> Result<(Vec<usize>, LeafLabelMap)> {
    let (int_newick, labels) = create_label_mapping(newick)?;
    let topology = remove_branch_lengths(&int_newick);
    let v = parse_vector(&topology, NewickDialect::new())?;
    Ok((v, labels))
}

/// Encodes a Newick string with taxon labels and branch lengths as [Phylo2Mat].
///
/// Like [parse_taxa_vector], but branch lengths are required on every
/// non-root node and kept as in [parse_matrix].
pub fn parse_taxa_matrix(newick: &str) -> Result<(Phylo2Mat, LeafLabelMap)> {
    let (int_newick, labels) = create_label_mapping(newick)?;
    let matrix = parse_matrix(&int_newick, NewickDialect::new())?;
    Ok((matrix, labels))
}

// ============================================================================
// QUICK WRITING API (pub)
// ============================================================================
/// Decodes a Phylo2Vec vector into a Newick string.
///
/// # Arguments
/// * `v` - Vector with `0 <= v[i] <= 2i` and at least one element
/// * `writer` - [NewickWriter] configuration (e.g. with or without parent labels)
///
/// # Returns
/// * `Ok(String)` - Newick string of the tree
/// * [InvalidVector](crate::Phylo2VecError::InvalidVector) - If `v` is not a valid vector
///
/// # Example
/// ```
/// use phylo2vec::newick::{write_vector, NewickWriter};
///
/// let newick = write_vector(&[0, 0], &NewickWriter::new()).unwrap();
/// assert_eq!(newick, "((0,2)3,1)4;");
/// ```
pub fn write_vector(v: &[usize], writer: &NewickWriter) -> Result<String> {
    let ancestry = Ancestry::from_vector(v)?;
    debug!("Decoding vector of a tree with {} leaves", ancestry.num_leaves());
    writer.write(&ancestry)
}

/// Decodes a [Phylo2Mat] into a Newick string with branch lengths.
///
/// # Errors
/// * [InvalidMatrix](crate::Phylo2VecError::InvalidMatrix) - If a branch
///   length is not strictly positive or the row counts differ
/// * [InvalidVector](crate::Phylo2VecError::InvalidVector) - If the
///   topology is not a valid vector
pub fn write_matrix(matrix: &Phylo2Mat, writer: &NewickWriter) -> Result<String> {
    matrix.validate()?;
    let ancestry = Ancestry::from_vector(&matrix.vector)?;
    debug!(
        "Decoding matrix of a tree with {} leaves",
        ancestry.num_leaves()
    );
    writer.write_with_branch_lengths(&ancestry, &matrix.branch_lengths)
}
