//! DTOs de configuración del concesionario

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dealership::{DayOfWeek, DealershipInfo, WorkingHour};
use crate::models::user::UserRole;

/// Datos del concesionario junto con su horario semanal
#[derive(Debug, Serialize)]
pub struct DealershipInfoResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub working_hours: Vec<WorkingHour>,
}

impl From<(DealershipInfo, Vec<WorkingHour>)> for DealershipInfoResponse {
    fn from((info, working_hours): (DealershipInfo, Vec<WorkingHour>)) -> Self {
        Self {
            id: info.id,
            name: info.name,
            address: info.address,
            phone: info.phone,
            email: info.email,
            working_hours,
        }
    }
}

/// Horario de un día en el request de guardado
#[derive(Debug, Clone, Deserialize)]
pub struct WorkingHourInput {
    pub day_of_week: DayOfWeek,
    pub open_time: String,
    pub close_time: String,
    pub is_open: bool,
}

/// Request para reemplazar el horario semanal completo
#[derive(Debug, Deserialize)]
pub struct SaveWorkingHoursRequest {
    pub working_hours: Vec<WorkingHourInput>,
}

/// Request para cambiar el rol de un usuario
#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
}
