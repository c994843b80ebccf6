use serde::Deserialize;

/// A list response, either bare or wrapped in `{"data": [...]}` (paginated
/// responses carry extra keys alongside `data`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Bare(Vec<T>),
    Enveloped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> Collection<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Enveloped { data: items } => items,
        }
    }
}

/// A single record response, either bare or wrapped in `{"data": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Single<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}
