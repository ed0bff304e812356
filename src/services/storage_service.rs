//! Servicio de almacenamiento de imágenes
//!
//! Este módulo habla con el bucket de objetos (API compatible con Supabase
//! Storage): subida de imágenes en lote, listado y borrado por carpeta.
//! Cada coche agrupa sus imágenes bajo el prefijo `cars/<id>`.

use base64::{engine::general_purpose::STANDARD, Engine};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    // data:image/<ext>;... -> <ext>, sólo para derivar la extensión
    static ref IMAGE_EXT_RE: Regex = Regex::new(r"data:image/([a-zA-Z0-9]+);").unwrap();
    // .../car-images/cars/<id>/... -> cars/<id>
    static ref FOLDER_RE: Regex = Regex::new(r"/car-images/(cars/[^/]+)").unwrap();
}

/// Resultado de cada imagen dentro del lote de subida
#[derive(Debug, Clone, PartialEq)]
pub enum ImageUploadOutcome {
    Uploaded { index: usize, public_url: String },
    Skipped { index: usize, reason: String },
    Failed { index: usize, error: String },
}

/// Objeto devuelto por el listado del bucket
#[derive(Debug, Deserialize)]
struct StorageObject {
    name: String,
}

pub struct StorageService {
    base_url: String,
    service_key: String,
    bucket: String,
    client: reqwest::Client,
}

impl StorageService {
    pub fn new(config: &EnvironmentConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            service_key: config.storage_service_key.clone(),
            bucket: config.storage_bucket.clone(),
            client,
        }
    }

    /// URL pública de un objeto del bucket
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Subir un blob y devolver su URL pública
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let path = format!("{}/{}", folder, file_name);
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Storage upload request failed: {}", e);
                AppError::ExternalService("Failed to reach storage service".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Storage upload failed with status {}: {}", status, error_text);
            return Err(AppError::ExternalService(format!(
                "Storage upload failed: {}",
                status
            )));
        }

        Ok(self.public_url(&path))
    }

    /// Listar los nombres de objeto bajo una carpeta
    pub async fn list_folder(&self, folder: &str) -> AppResult<Vec<String>> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .json(&json!({ "prefix": folder, "limit": 1000, "offset": 0 }))
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Storage list request failed: {}", e);
                AppError::ExternalService("Failed to reach storage service".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Storage list failed with status {}: {}", status, error_text);
            return Err(AppError::ExternalService(format!(
                "Storage list failed: {}",
                status
            )));
        }

        let objects: Vec<StorageObject> = response.json().await.map_err(|e| {
            log::error!("❌ Failed to parse storage list response: {}", e);
            AppError::ExternalService("Invalid storage list response".to_string())
        })?;

        Ok(objects.into_iter().map(|o| o.name).collect())
    }

    /// Borrar un conjunto de objetos por path completo
    pub async fn remove_objects(&self, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);

        let response = self
            .client
            .delete(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Storage delete request failed: {}", e);
                AppError::ExternalService("Failed to reach storage service".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Storage delete failed with status {}: {}", status, error_text);
            return Err(AppError::ExternalService(format!(
                "Storage delete failed: {}",
                status
            )));
        }

        Ok(())
    }

    /// Subir el lote de imágenes de un coche.
    ///
    /// Cada entrada es un data-URL; las entradas malformadas se saltan y las
    /// subidas fallidas se registran por posición. La política de qué hacer
    /// con el lote (abortar, aceptar parcial) es del caller.
    pub async fn upload_car_images(
        &self,
        car_id: Uuid,
        images: &[String],
    ) -> Vec<ImageUploadOutcome> {
        let folder = car_folder(car_id);
        let mut outcomes = Vec::with_capacity(images.len());

        for (index, data_url) in images.iter().enumerate() {
            let (extension, bytes) = match parse_data_url(data_url) {
                Some(parsed) => parsed,
                None => {
                    log::warn!("⚠️ Skipping invalid image data at index {}", index);
                    outcomes.push(ImageUploadOutcome::Skipped {
                        index,
                        reason: "invalid image data".to_string(),
                    });
                    continue;
                }
            };

            let timestamp = chrono::Utc::now().timestamp_millis();
            let file_name = format!("image-{}-{}.{}", timestamp, index, extension);
            let content_type = format!("image/{}", extension);

            match self.upload(&folder, &file_name, bytes, &content_type).await {
                Ok(public_url) => {
                    log::info!("✅ Uploaded image {} for car {}", index, car_id);
                    outcomes.push(ImageUploadOutcome::Uploaded { index, public_url });
                }
                Err(e) => {
                    outcomes.push(ImageUploadOutcome::Failed {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }

    /// Borrar todas las imágenes de la carpeta de un coche.
    ///
    /// Devuelve cuántos objetos se borraron. Sin carpeta no hay nada que
    /// limpiar; los errores suben como `ExternalService` y el caller decide
    /// si son fatales.
    pub async fn delete_car_folder(&self, folder: &str) -> AppResult<usize> {
        let names = self.list_folder(folder).await?;
        if names.is_empty() {
            log::info!("🔍 No stored images under '{}'", folder);
            return Ok(0);
        }

        let paths: Vec<String> = names
            .iter()
            .map(|name| format!("{}/{}", folder, name))
            .collect();

        self.remove_objects(&paths).await?;
        log::info!("🗑️ Removed {} objects under '{}'", paths.len(), folder);
        Ok(paths.len())
    }
}

/// Carpeta del bucket que agrupa las imágenes de un coche
pub fn car_folder(car_id: Uuid) -> String {
    format!("cars/{}", car_id)
}

/// Descomponer un data-URL de imagen en (extensión, bytes).
///
/// Malformado significa sin prefijo `data:image/`, sin coma separadora o con
/// base64 que no decodifica. La extensión se deriva aparte y cae a `jpeg`
/// cuando el subtipo no es un identificador simple (`svg+xml`, parámetros
/// extra en el header).
pub fn parse_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    if !data_url.starts_with("data:image/") {
        return None;
    }

    let (_, payload) = data_url.split_once(',')?;
    let bytes = STANDARD.decode(payload).ok()?;

    let extension = IMAGE_EXT_RE
        .captures(data_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "jpeg".to_string());

    Some((extension, bytes))
}

/// Derivar la carpeta de un coche desde una URL pública (filas legacy
/// sin `folder_path` persistido)
pub fn derive_folder_path(image_url: &str) -> Option<String> {
    FOLDER_RE
        .captures(image_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url_with_declared_type() {
        let encoded = STANDARD.encode(b"fake-png-bytes");
        let data_url = format!("data:image/png;base64,{}", encoded);

        let (extension, bytes) = parse_data_url(&data_url).unwrap();
        assert_eq!(extension, "png");
        assert_eq!(bytes, b"fake-png-bytes");
    }

    #[test]
    fn test_parse_data_url_defaults_to_jpeg() {
        let encoded = STANDARD.encode(b"bytes");
        let data_url = format!("data:image/;base64,{}", encoded);

        let (extension, _) = parse_data_url(&data_url).unwrap();
        assert_eq!(extension, "jpeg");
    }

    #[test]
    fn test_parse_data_url_compound_subtype_is_valid_with_jpeg_fallback() {
        let (extension, bytes) = parse_data_url("data:image/svg+xml;base64,aGVsbG8=").unwrap();
        assert_eq!(extension, "jpeg");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_parse_data_url_ignores_extra_header_parameters() {
        let encoded = STANDARD.encode(b"bytes");
        let data_url = format!("data:image/png;name=photo.png;base64,{}", encoded);

        let (extension, _) = parse_data_url(&data_url).unwrap();
        assert_eq!(extension, "png");
    }

    #[test]
    fn test_parse_data_url_rejects_malformed_input() {
        assert!(parse_data_url("https://example.com/photo.jpg").is_none());
        assert!(parse_data_url("data:text/plain;base64,aGVsbG8=").is_none());
        assert!(parse_data_url("data:image/png;base64").is_none());
        assert!(parse_data_url("data:image/png;base64,!!!not-base64!!!").is_none());
    }

    #[test]
    fn test_car_folder_shape() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            car_folder(id),
            "cars/550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_derive_folder_path_from_public_url() {
        let url = "https://abc.supabase.co/storage/v1/object/public/car-images/cars/550e8400-e29b-41d4-a716-446655440000/image-1712345-0.png";
        assert_eq!(
            derive_folder_path(url).unwrap(),
            "cars/550e8400-e29b-41d4-a716-446655440000"
        );

        assert!(derive_folder_path("https://example.com/other/path.png").is_none());
    }

    #[test]
    fn test_public_url_shape() {
        let service = StorageService {
            base_url: "https://abc.supabase.co".to_string(),
            service_key: "key".to_string(),
            bucket: "car-images".to_string(),
            client: reqwest::Client::new(),
        };

        assert_eq!(
            service.public_url("cars/x/image-1-0.png"),
            "https://abc.supabase.co/storage/v1/object/public/car-images/cars/x/image-1-0.png"
        );
    }
}
