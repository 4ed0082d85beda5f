use crate::sprite::SheetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
  #[error("SDL error: {0}")]
  SdlError(String),

  #[error("No texture loaded for sheet {0:?}")]
  MissingTexture(SheetId),
}
