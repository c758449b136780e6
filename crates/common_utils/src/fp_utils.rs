//! Functional programming utilities

/// Run `f` only when `predicate` holds, otherwise succeed.
///
/// Keeps validation code flat: `when(total.is_zero(), || Err(..))?;`
pub fn when<W, F>(predicate: bool, f: F) -> Result<(), W>
where
    F: FnOnce() -> Result<(), W>,
{
    if predicate {
        f()
    } else {
        Ok(())
    }
}
