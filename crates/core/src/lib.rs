pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;

pub use domain::catalog::{BodyType, BodyTypeId, ConfigurationId, RegisteredVehicle, Size, SizeId};
pub use domain::pricing::{FeatureType, PriceOverride, PricingRule, UnknownFeatureType};
pub use domain::quote::{
    ConditionFlags, QuoteId, QuoteRecord, QuoteRequest, SubmittedQuote, VehicleDescription,
};
pub use engine::offer::{
    compute_offer, OfferOutcome, OfferSource, OfferStep, PricingSnapshot, FINAL_OFFER_MESSAGE,
    INSPECTION_MESSAGE,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
