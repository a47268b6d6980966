pub mod codec;
mod io;

pub use codec::{decode_tree, encode_tree, GroupDoc, ItemDoc, LayoutsDocument, ObjectDoc, PersistError};
