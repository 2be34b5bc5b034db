pub mod canvas_service;
