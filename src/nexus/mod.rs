//! # Hierarchical Format (`.orb`)
//!
//! A NeXus-style tree of groups and leaves stored in a ZIP container.
//!
//! ```text
//! mimetype                    "application/vnd.orso.orb" (stored, first entry)
//! .group.json                 {NX_class: NXroot, orso_version, default, creator, comment?}
//! <data_set>/                 {NX_class: NXentry, sequence_index}
//!   header/                   {ORSO_class: Orso}
//!     data_source/            {ORSO_class: DataSource}
//!       owner/                {ORSO_class: Person}
//!         name                leaf
//!     columns/                {sequence: true}
//!       0/                    {ORSO_class: Column, sequence_index: 0}
//!   data/                     {NX_class: NXdata, signal, axes}
//!     Qz                      float array {column_index: 0, units}
//!     R                       float array {column_index: 1, uncertainties: sR}
//! ```
//!
//! Records become groups tagged with their type name, lists become groups
//! whose children carry their position, and mappings are embedded as JSON
//! text. The reader uses the tags to pick record types and the declared
//! field types for everything else; tags are not kept in the decoded
//! headers.

mod config;
mod container;
mod error;
mod float_repr;
mod reader;
mod tree;
mod writer;


pub use config::{EntryCompression, NexusWriterConfig};
pub use error::NexusError;
pub use reader::{decode_nexus, load_nexus, load_nexus_file, read_nexus, NexusFile};
pub use tree::{AttrValue, Group, Leaf, LeafData, Node};
pub use writer::{encode_nexus, save_nexus, write_nexus};

/// Attribute and node names used in the tree
pub mod keys {
    /// NeXus class of a group
    pub const NX_CLASS: &str = "NX_class";
    /// Record type of a group
    pub const ORSO_CLASS: &str = "ORSO_class";
    /// Format version on the root group
    pub const ORSO_VERSION: &str = "orso_version";
    /// Marks a group holding a list
    pub const SEQUENCE: &str = "sequence";
    /// Position of a list element or entry
    pub const SEQUENCE_INDEX: &str = "sequence_index";
    /// Position of a data column
    pub const COLUMN_INDEX: &str = "column_index";
    /// Content type of a leaf holding embedded JSON
    pub const MIMETYPE: &str = "mimetype";
    /// Default entry
    pub const DEFAULT: &str = "default";
    /// Writing program
    pub const CREATOR: &str = "creator";
    /// Root comment
    pub const COMMENT: &str = "comment";
    /// Plotted column
    pub const SIGNAL: &str = "signal";
    /// Abscissa columns
    pub const AXES: &str = "axes";
    /// Unit of a data column
    pub const UNITS: &str = "units";
    /// Quantity tag of a data column
    pub const PHYSICAL_QUANTITY: &str = "physical_quantity";
    /// Annotated column of an error column
    pub const ERROR_OF: &str = "error_of";
    /// Name of the column holding the errors of this one
    pub const UNCERTAINTIES: &str = "uncertainties";
    /// Header group of an entry
    pub const HEADER: &str = "header";
    /// Data group of an entry
    pub const DATA: &str = "data";
}
