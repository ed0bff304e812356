//! Services module
//!
//! Este módulo contiene los adaptadores hacia los sistemas externos:
//! el bucket de imágenes y el modelo multimodal de extracción.

pub mod storage_service;
pub mod vision_service;

pub use storage_service::*;
pub use vision_service::*;
