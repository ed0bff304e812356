use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{
    CarData, CreateCarRequest, ExtractCarRequest, ExtractedCarDetails, UpdateCarStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::car::Car;
use crate::repositories::car_repository::CarRepository;
use crate::services::storage_service::{self, ImageUploadOutcome, StorageService};
use crate::services::vision_service::VisionService;
use crate::state::AppState;
use crate::utils::errors::{field_error, not_found_error, validation_error, AppError};
use crate::utils::validation::{
    validate_length, validate_non_negative, validate_not_empty, validate_positive, validate_range,
};

pub struct CarController {
    repository: CarRepository,
    storage: StorageService,
    vision: VisionService,
}

impl CarController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: CarRepository::new(state.pool.clone()),
            storage: StorageService::new(&state.config, state.http_client.clone()),
            vision: VisionService::new(&state.config, state.http_client.clone()),
        }
    }

    pub async fn create_car(
        &self,
        request: CreateCarRequest,
    ) -> Result<ApiResponse<Car>, AppError> {
        // Validar campos
        request.car_data.validate()?;
        validate_car_data(&request.car_data)?;

        if request.images.is_empty() {
            return Err(validation_error("images", "At least one image is required"));
        }

        // El id se genera antes de insertar para poder nombrar la carpeta
        // del bucket; la fila sólo se escribe si la subida va bien
        let car_id = Uuid::new_v4();
        let outcomes = self.storage.upload_car_images(car_id, &request.images).await;
        let image_urls = collect_uploaded_urls(&outcomes)?;

        let car = self
            .repository
            .create(
                car_id,
                &request.car_data,
                image_urls,
                storage_service::car_folder(car_id),
            )
            .await?;

        log::info!("🚗 Car created: {} {} ({})", car.make, car.model, car.id);

        Ok(ApiResponse::success_with_message(
            car,
            "Car created successfully".to_string(),
        ))
    }

    pub async fn get_cars(&self, search: Option<String>) -> Result<Vec<Car>, AppError> {
        if let Some(term) = &search {
            validate_length(term, 0, 100).map_err(|e| field_error("search", e))?;
        }

        self.repository.search(search.as_deref()).await
    }

    pub async fn get_car(&self, id: Uuid) -> Result<Car, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    pub async fn get_featured_cars(&self, limit: Option<i64>) -> Result<Vec<Car>, AppError> {
        let limit = limit.unwrap_or(3);
        validate_range(limit, 1, 50).map_err(|e| field_error("limit", e))?;

        self.repository.list_featured(limit).await
    }

    pub async fn update_car_status(
        &self,
        id: Uuid,
        request: UpdateCarStatusRequest,
    ) -> Result<ApiResponse<Car>, AppError> {
        let car = self
            .repository
            .update_status(id, request.status, request.featured)
            .await?;

        log::info!(
            "✅ Car {} updated: status={:?} featured={}",
            car.id,
            car.status,
            car.featured
        );

        Ok(ApiResponse::success_with_message(
            car,
            "Car updated successfully".to_string(),
        ))
    }

    pub async fn delete_car(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        // Borrar la fila primero; si el coche no existe el bucket no se toca
        let car = self.repository.delete(id).await?;

        // Los fallos de limpieza del bucket se registran y no revierten
        // el borrado
        let folder = car.folder_path.clone().or_else(|| {
            car.images
                .first()
                .and_then(|url| storage_service::derive_folder_path(url))
        });

        match folder {
            Some(folder) => match self.storage.delete_car_folder(&folder).await {
                Ok(count) => {
                    log::info!("🗑️ Deleted car {} and {} stored images", car.id, count);
                }
                Err(e) => {
                    log::error!("⚠️ Car {} deleted but storage cleanup failed: {}", car.id, e);
                }
            },
            None => {
                log::warn!(
                    "⚠️ Car {} has no resolvable storage folder, skipping cleanup",
                    car.id
                );
            }
        }

        Ok(ApiResponse::success_with_message(
            (),
            "Car deleted successfully".to_string(),
        ))
    }

    pub async fn extract_car_details(
        &self,
        request: ExtractCarRequest,
    ) -> Result<ExtractedCarDetails, AppError> {
        let (extension, bytes) = storage_service::parse_data_url(&request.image)
            .ok_or_else(|| validation_error("image", "Invalid image data"))?;

        let mime_type = format!("image/{}", extension);
        self.vision.extract_car_details(&bytes, &mime_type).await
    }
}

/// Chequeos que el derive no cubre: strings con sólo espacios y
/// numéricos con signo
fn validate_car_data(data: &CarData) -> Result<(), AppError> {
    validate_not_empty(&data.make).map_err(|e| field_error("make", e))?;
    validate_not_empty(&data.model).map_err(|e| field_error("model", e))?;
    validate_positive(data.price).map_err(|e| field_error("price", e))?;
    validate_non_negative(data.mileage).map_err(|e| field_error("mileage", e))?;

    if let Some(seats) = data.seats {
        validate_positive(seats).map_err(|e| field_error("seats", e))?;
    }

    Ok(())
}

/// Política del lote de subida: cualquier fallo duro aborta el alta con
/// `ExternalService`; un lote sin ninguna URL subida la aborta con error
/// de validación. Las entradas saltadas no cuentan.
fn collect_uploaded_urls(outcomes: &[ImageUploadOutcome]) -> Result<Vec<String>, AppError> {
    let mut image_urls = Vec::new();

    for outcome in outcomes {
        match outcome {
            ImageUploadOutcome::Uploaded { public_url, .. } => {
                image_urls.push(public_url.clone());
            }
            ImageUploadOutcome::Failed { index, error } => {
                return Err(AppError::ExternalService(format!(
                    "Failed to upload image {}: {}",
                    index, error
                )));
            }
            ImageUploadOutcome::Skipped { .. } => {}
        }
    }

    if image_urls.is_empty() {
        return Err(validation_error("images", "No valid images were provided"));
    }

    Ok(image_urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_policy_collects_urls_and_ignores_skips() {
        let outcomes = vec![
            ImageUploadOutcome::Uploaded {
                index: 0,
                public_url: "https://storage/cars/x/image-1-0.png".to_string(),
            },
            ImageUploadOutcome::Skipped {
                index: 1,
                reason: "invalid image data".to_string(),
            },
            ImageUploadOutcome::Uploaded {
                index: 2,
                public_url: "https://storage/cars/x/image-1-2.png".to_string(),
            },
        ];

        let urls = collect_uploaded_urls(&outcomes).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://storage/cars/x/image-1-0.png");
    }

    #[test]
    fn test_upload_policy_fails_hard_on_upload_error() {
        let outcomes = vec![
            ImageUploadOutcome::Uploaded {
                index: 0,
                public_url: "https://storage/cars/x/image-1-0.png".to_string(),
            },
            ImageUploadOutcome::Failed {
                index: 1,
                error: "Storage upload failed: 503".to_string(),
            },
        ];

        let error = collect_uploaded_urls(&outcomes).unwrap_err();
        assert!(matches!(error, AppError::ExternalService(_)));
    }

    #[test]
    fn test_upload_policy_rejects_batch_with_nothing_uploaded() {
        let outcomes = vec![
            ImageUploadOutcome::Skipped {
                index: 0,
                reason: "invalid image data".to_string(),
            },
            ImageUploadOutcome::Skipped {
                index: 1,
                reason: "invalid image data".to_string(),
            },
        ];

        let error = collect_uploaded_urls(&outcomes).unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }
}
