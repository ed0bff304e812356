//! DTOs del dashboard de administración

use serde::Serialize;

use crate::models::booking::BookingStats;
use crate::models::car::CarStats;

/// Bloque de inventario del dashboard
#[derive(Debug, Serialize)]
pub struct CarDashboard {
    pub total: i64,
    pub available: i64,
    pub sold: i64,
}

/// Bloque de reservas del dashboard
#[derive(Debug, Serialize)]
pub struct TestDriveDashboard {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub conversion_rate: f64,
}

/// Payload completo del dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub cars: CarDashboard,
    pub test_drives: TestDriveDashboard,
}

impl From<(CarStats, BookingStats)> for DashboardResponse {
    fn from((cars, bookings): (CarStats, BookingStats)) -> Self {
        let conversion_rate = bookings.conversion_rate();
        Self {
            cars: CarDashboard {
                total: cars.total,
                available: cars.available,
                sold: cars.sold,
            },
            test_drives: TestDriveDashboard {
                total: bookings.total,
                pending: bookings.pending,
                confirmed: bookings.confirmed,
                completed: bookings.completed,
                conversion_rate,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_assembly() {
        let cars = CarStats {
            total: 12,
            available: 9,
            sold: 2,
        };
        let bookings = BookingStats {
            total: 4,
            pending: 1,
            confirmed: 1,
            completed: 1,
        };

        let dashboard = DashboardResponse::from((cars, bookings));
        assert_eq!(dashboard.cars.available, 9);
        assert_eq!(dashboard.test_drives.conversion_rate, 25.0);
    }
}
