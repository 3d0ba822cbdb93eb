// Codec, tree, and rendering modules for the `.lang` format.
pub mod error;
pub mod flatten;
pub mod header;
pub mod record;
pub mod render;
pub mod tree;
pub mod ucs2;
