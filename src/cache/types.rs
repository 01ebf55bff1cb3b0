/// How a ranked result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// Served from the cache backend.
    Hit,
    /// Computed by the strategy (and stored, if the backend accepted it).
    Miss,
    /// No backend configured or it was unreachable at startup.
    Disabled,
}

impl CacheStatus {
    /// Upper-case name used in logs.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Disabled => "DISABLED",
        }
    }

    /// True only for [`CacheStatus::Hit`].
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
