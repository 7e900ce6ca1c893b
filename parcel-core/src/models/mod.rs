mod gang_schedule;
mod maritime;
mod reference;
mod vessel_info;

pub use gang_schedule::{DayCategory, GangField, GangScheduleRow, default_gang_schedule};
pub use maritime::{
    ApiGangSchedule, ApiVessel, Coordinates, CostBucket, ForecastData, HealthStatus, KpiData,
    LeverKind, Port, PotentialSavings, Recommendation, Route, RouteAnalysis, SensitivityAnalysis,
    StrategicLever, TrendPoint,
};
pub use reference::{ReferencePort, ReferenceVessel};
pub use vessel_info::{VesselField, VesselInfo};
