//! Auth domain - magic-link tokens and redirect safety

pub mod magic_link;
pub mod redirect;

pub use magic_link::{magic_link_url, MagicLinkService, TokenPurpose, TokenRejection};
pub use redirect::RedirectValidator;
