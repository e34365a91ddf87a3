pub mod form_export;
pub mod owner_applications;
