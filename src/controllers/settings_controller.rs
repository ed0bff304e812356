use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::settings_dto::{
    DealershipInfoResponse, SaveWorkingHoursRequest, UpdateUserRoleRequest,
};
use crate::dto::ApiResponse;
use crate::models::dealership::{DayOfWeek, WorkingHour};
use crate::models::user::UserResponse;
use crate::repositories::dealership_repository::DealershipRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{field_error, validation_error, AppError};
use crate::utils::validation::{validate_slot_order, validate_time_slot};

pub struct SettingsController {
    dealership: DealershipRepository,
    users: UserRepository,
}

impl SettingsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            dealership: DealershipRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn get_dealership_info(&self) -> Result<DealershipInfoResponse, AppError> {
        let (info, hours) = self.dealership.get_or_seed().await?;
        Ok(DealershipInfoResponse::from((info, hours)))
    }

    pub async fn save_working_hours(
        &self,
        request: SaveWorkingHoursRequest,
    ) -> Result<ApiResponse<Vec<WorkingHour>>, AppError> {
        if request.working_hours.is_empty() {
            return Err(validation_error(
                "working_hours",
                "At least one day is required",
            ));
        }

        // Validar cada entrada y rechazar días repetidos
        let mut seen: Vec<DayOfWeek> = Vec::new();
        for entry in &request.working_hours {
            if seen.contains(&entry.day_of_week) {
                return Err(validation_error(
                    "working_hours",
                    "Duplicate day in working hours",
                ));
            }
            seen.push(entry.day_of_week);

            let open =
                validate_time_slot(&entry.open_time).map_err(|e| field_error("open_time", e))?;
            let close =
                validate_time_slot(&entry.close_time).map_err(|e| field_error("close_time", e))?;

            // Un día cerrado conserva sus horas sólo como texto informativo
            if entry.is_open {
                validate_slot_order(open, close).map_err(|e| field_error("close_time", e))?;
            }
        }

        let hours = self
            .dealership
            .save_working_hours(&request.working_hours)
            .await?;

        log::info!("💾 Working hours saved ({} days)", hours.len());

        Ok(ApiResponse::success_with_message(
            hours,
            "Working hours saved successfully".to_string(),
        ))
    }

    pub async fn get_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_user_role(
        &self,
        user_id: Uuid,
        request: UpdateUserRoleRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self.users.update_role(user_id, request.role).await?;

        log::info!("✅ User {} role set to {:?}", user.id, user.role);

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "User role updated".to_string(),
        ))
    }
}
