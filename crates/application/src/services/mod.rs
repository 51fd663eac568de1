//! Application services - Use case implementations

mod trip_planning_service;

pub use trip_planning_service::{
    DEFAULT_FALLBACK_ATTEMPTS, DEFAULT_FALLBACK_STEP_MINUTES, FallbackPolicy, TripPlanningService,
    next_departure,
};
