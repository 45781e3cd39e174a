use std::fmt;

/// Outcome of one remote call as the pipeline sees it. Provider errors and
/// timeouts are flattened into `Unavailable` with a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Ok(T),
    Unavailable(String),
}

impl<T> Fetch<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Fetch::Unavailable(reason.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Fetch::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Fetch::Ok(v) => Some(v),
            Fetch::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Fetch::Ok(_) => None,
            Fetch::Unavailable(r) => Some(r),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetch<U> {
        match self {
            Fetch::Ok(v) => Fetch::Ok(f(v)),
            Fetch::Unavailable(r) => Fetch::Unavailable(r),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.ok().unwrap_or(default)
    }
}

impl<T: Default> Fetch<T> {
    pub fn unwrap_or_default(self) -> T {
        self.ok().unwrap_or_default()
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Fetch<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Fetch::Ok(v),
            Err(e) => Fetch::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result_keeps_error_text() {
        let f: Fetch<u32> = Err::<u32, _>(anyhow::anyhow!("quota exceeded")).into();
        assert_eq!(f.reason(), Some("quota exceeded"));
        assert!(!f.is_ok());
    }

    #[test]
    fn unavailable_defaults_to_empty() {
        let f: Fetch<Vec<String>> = Fetch::unavailable("timeout");
        assert!(f.unwrap_or_default().is_empty());
    }

    #[test]
    fn map_passes_reason_through() {
        let f: Fetch<u32> = Fetch::unavailable("down");
        assert_eq!(f.map(|n| n + 1), Fetch::Unavailable("down".into()));
        assert_eq!(Fetch::Ok(1).map(|n| n + 1), Fetch::Ok(2));
    }
}
