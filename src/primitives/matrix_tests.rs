pub(crate) use super::*;

// Test-only accessor used by unit tests; not part of the library API.
impl Matrix<f64> {
    pub(crate) fn column(&self, col_idx: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, col_idx)).collect()
    }
}

#[test]
fn test_from_vec() {
    let m: Matrix<f64> = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0]);
    assert!(matches!(result, Err(EvalError::DimensionMismatch { .. })));
}

#[test]
fn test_from_rows() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
        .expect("rows have equal length");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(2), &[5.0, 6.0]);
}

#[test]
fn test_from_rows_ragged() {
    let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    assert!(result.is_err());
}

#[test]
fn test_ones_is_intercept_design() {
    let m = Matrix::ones(4, 1);
    assert_eq!(m.shape(), (4, 1));
    assert_eq!(m.column(0), vec![1.0; 4]);
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 1) - 4.0).abs() < 1e-12);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-12);
    assert_eq!(t.transpose(), m);
}

#[test]
fn test_row_and_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    let rows: Vec<&[f64]> = m.iter_rows().collect();
    assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
}

#[test]
fn test_matmul() {
    // 2x3 * 3x2 = 2x2
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0])
        .expect("test data has correct dimensions: 3*2=6 elements");
    let c = a.matmul(&b).expect("inner dimensions agree");

    assert_eq!(c.shape(), (2, 2));
    // c[0,0] = 1*7 + 2*9 + 3*11 = 58
    assert!((c.get(0, 0) - 58.0).abs() < 1e-12);
    // c[0,1] = 1*8 + 2*10 + 3*12 = 64
    assert!((c.get(0, 1) - 64.0).abs() < 1e-12);
    assert!((c.get(1, 1) - 154.0).abs() < 1e-12);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::from_vec(2, 3, vec![1.0; 6]).expect("2*3=6 elements");
    let b = Matrix::from_vec(2, 2, vec![1.0; 4]).expect("2*2=4 elements");
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_matvec() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let result = m.matvec(&[1.0, 2.0, 3.0]).expect("lengths agree");
    assert_eq!(result, vec![14.0, 32.0]);
    assert!(m.matvec(&[1.0, 2.0]).is_err());
}

#[test]
fn test_cholesky_factor_reconstructs() {
    let a = Matrix::from_vec(3, 3, vec![4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0])
        .expect("3*3=9 elements");
    let l = a.cholesky().expect("matrix is SPD");
    // Known factor: [[2,0,0],[6,1,0],[-8,5,3]]
    assert!((l.get(0, 0) - 2.0).abs() < 1e-12);
    assert!((l.get(1, 0) - 6.0).abs() < 1e-12);
    assert!((l.get(2, 1) - 5.0).abs() < 1e-12);
    assert!((l.get(2, 2) - 3.0).abs() < 1e-12);
    assert!(l.get(0, 2).abs() < 1e-12);

    let llt = l.matmul(&l.transpose()).expect("square");
    for (x, y) in llt.as_slice().iter().zip(a.as_slice()) {
        assert!((x - y).abs() < 1e-9);
    }
}

#[test]
fn test_cholesky_substitution_solves() {
    // A = [[9, 3, 3], [3, 5, 1], [3, 1, 4]], b = [15, 9, 8] => x = [1, 1, 1]
    let a = Matrix::from_vec(3, 3, vec![9.0, 3.0, 3.0, 3.0, 5.0, 1.0, 3.0, 1.0, 4.0])
        .expect("3*3=9 elements");
    let l = a.cholesky().expect("SPD system");
    let x = l.back_substitute_transpose(&l.forward_substitute(&[15.0, 9.0, 8.0]));
    for xi in x {
        assert!((xi - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_cholesky_not_positive_definite() {
    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 1.0]).expect("2*2=4 elements");
    assert!(matches!(a.cholesky(), Err(EvalError::SingularMatrix(_))));
}

#[test]
fn test_back_substitute_transpose() {
    let a = Matrix::from_vec(2, 2, vec![4.0, 2.0, 2.0, 3.0]).expect("2*2=4 elements");
    let l = a.cholesky().expect("SPD");
    // Lᵀ x = y, check L Lᵀ x = L y
    let y = vec![1.0, -1.0];
    let x = l.back_substitute_transpose(&y);
    let lt_x = l.transpose().matvec(&x).expect("square");
    assert!((lt_x[0] - y[0]).abs() < 1e-12);
    assert!((lt_x[1] - y[1]).abs() < 1e-12);
}

#[test]
fn test_set() {
    let mut m = Matrix::ones(2, 2);
    m.set(0, 1, 5.0);
    assert!((m.get(0, 1) - 5.0).abs() < 1e-12);
    assert_eq!(m.get(1, 1), 1.0);
}

#[test]
fn test_from_raw() {
    let m = Matrix::from_raw(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(m, Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("2*2=4 elements"));
}
