/// Utility function to convert a 3x3 array to a faer matrix 3x3.
///
/// # Arguments
///
/// * `array` - A 3x3 array, row major.
///
/// # Returns
///
/// A faer matrix 3x3.
pub fn array33_to_faer_mat33(array: &[[f64; 3]; 3]) -> faer::MatRef<'_, f64> {
    faer::mat::from_row_major_slice(array.as_flattened(), 3, 3)
}

/// View a list of points as a Nx3 faer matrix, one point per row.
pub fn points_to_faer_mat(points: &[[f64; 3]]) -> faer::MatRef<'_, f64> {
    faer::mat::from_row_major_slice(points.as_flattened(), points.len(), 3)
}

/// Copy a 3x3 faer matrix back to a row major array.
pub fn faer_mat33_to_array33(mat: faer::MatRef<'_, f64>) -> [[f64; 3]; 3] {
    let mut array = [[0.0; 3]; 3];
    for (i, row) in array.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = mat.read(i, j);
        }
    }
    array
}
