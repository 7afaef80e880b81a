pub mod http_email_service;
