pub mod animation_service;
pub mod banner_service;
pub mod chart_service;
