pub mod scan_service;
