mod index;
mod gather;

pub use index::{create_index_matrix, create_index_matrix_with, IndexMatrix, IndexPlan};
pub use gather::Gather;
