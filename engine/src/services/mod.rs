pub mod reliability_service;
