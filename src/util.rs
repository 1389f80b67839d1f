
//! Various utility functions.

/// Combines two arrays of the same length elementwise.
pub fn zip_with<const C: usize, T, S, U, F>(left: [T; C], right: [S; C], mut f: F) -> [U; C]
where F: FnMut(T, S) -> U {
  let combined: Result<[U; C], _> = left.into_iter().zip(right)
    .map(|(x, y)| f(x, y))
    .collect::<Vec<_>>()
    .try_into();
  match combined {
    Ok(combined) => combined,
    Err(_) => unreachable!("zip of two arrays of length {} changed length", C),
  }
}
