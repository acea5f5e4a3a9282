/// Sectioned task files: upper-case headers (`COMBUSTOR`, `FUEL`, `OXIDIZER`) each followed
/// by a JSON object. Parse errors are reported with the line of the file they occurred on.
pub mod task_file;
/// serde helpers storing a square `nalgebra::DMatrix` as nested JSON arrays (row-major).
pub mod square_matrix;
