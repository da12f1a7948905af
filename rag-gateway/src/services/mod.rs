pub mod backend_service;
