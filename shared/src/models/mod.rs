//! Domain Models
//!
//! One module per entity, each carrying its status enum, the stored row
//! struct, and the request/response payloads that travel over the API.

pub mod attendance;
pub mod catalog;
pub mod membership;
pub mod payment;
pub mod reservation;
pub mod session;

pub use attendance::{Attendance, AttendanceDetail, CheckInRequest};
pub use catalog::{ActivityDefinition, CatalogSync, Club, MembershipPlan, UserAccount};
pub use membership::{
    ApproveMembershipRequest, MembershipDetail, MembershipStatus, PurchaseMembershipRequest,
    RejectMembershipRequest, UserMembership, ValidateMembershipResponse,
};
pub use payment::{
    Payment, PaymentHistoryDetail, PaymentMethod, PaymentStatus, PendingPaymentDetail,
    RecordPaymentRequest,
};
pub use reservation::{Reservation, ReservationCancel, ReservationCreate, ReservationStatus};
pub use session::{ClassSession, SessionCreate, SessionStatus, SessionStatusUpdate};
