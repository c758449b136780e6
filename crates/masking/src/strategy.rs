use core::fmt;

/// Debugging trait which is specialized for handling secret values
pub trait Strategy<T> {
    /// Format information about the secret's type.
    fn fmt(value: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Debug with type
#[derive(Debug)]
pub struct WithType;

impl<T> Strategy<T> for WithType {
    fn fmt(_: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("*** ")?;
        fmt.write_str(std::any::type_name::<T>())?;
        fmt.write_str(" ***")
    }
}

/// Client secrets keep the authorization id prefix visible.
///
/// `pi_3Nx_secret_abc` prints as `pi_3Nx_secret_***`, which is enough to
/// correlate a log line with an authorization without exposing the secret.
#[derive(Debug)]
pub struct ClientSecret;

impl<T> Strategy<T> for ClientSecret
where
    T: AsRef<str>,
{
    fn fmt(value: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value.as_ref().split_once("_secret_") {
            Some((prefix, _)) => write!(fmt, "{prefix}_secret_***"),
            None => fmt.write_str("*** client-secret ***"),
        }
    }
}
