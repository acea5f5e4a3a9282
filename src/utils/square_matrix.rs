use nalgebra::DMatrix;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(matrix: &DMatrix<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let rows: Vec<Vec<f64>> = matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    rows.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DMatrix<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Vec<f64>> = Deserialize::deserialize(deserializer)?;
    let n = rows.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(D::Error::custom(format!(
            "matrix must be square: row {} has {} entries, expected {}",
            i,
            row.len(),
            n
        )));
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}
