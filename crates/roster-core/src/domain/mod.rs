pub mod email;
pub mod gender;
pub mod ids;
pub mod participant;
pub mod payment;
pub mod phone;
pub mod registration;

pub use email::{email_local_part, is_valid_email, normalize_email};
pub use gender::Gender;
pub use ids::{ParticipantId, PaymentId};
pub use participant::{Participant, ParticipantDraft};
pub use payment::{validate_payment_amount, Payment, PaymentStatus};
pub use phone::{
    is_canonical_phone, normalize_phone, strip_phone_formatting, PhonePolicy,
    DEFAULT_COUNTRY_CODE, DEFAULT_PRESERVED_COUNTRY_CODES,
};
pub use registration::{MatchedBy, RegistrationMatch, RegistrationQuery};
