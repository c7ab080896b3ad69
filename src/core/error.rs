use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Degenerate walkable polygon ({vertices} vertices)")]
    DegeneratePolygon { vertices: usize },

    #[error("Painting not found: {0:?}")]
    UnknownPainting(crate::core::types::PaintingId),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
