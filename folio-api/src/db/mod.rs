//! Database access for submissions
//!
//! Schema creation lives in `folio_common::db`; this module holds the
//! queries the handlers run.

pub mod contacts;
pub mod inquiries;

pub use contacts::insert_contact_message;
pub use inquiries::{attach_file_urls, get_inquiry, insert_inquiry, InquiryRecord};
