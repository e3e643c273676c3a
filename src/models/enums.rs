//! Status and category enumerations.
//!
//! Every enum is stored and serialized as its SCREAMING_SNAKE_CASE name.
//! Parsing is case-insensitive and treats `-` and spaces as `_`, so form
//! values like `"under review"` or `"medical"` are accepted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string did not name any variant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $( $text $(| $alias)* => Ok($name::$variant), )+
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// Platform role of a user.
    UserRole {
        User => "USER",
        Moderator => "MODERATOR",
        Admin => "ADMIN",
    }
}

string_enum! {
    /// What a charity request asks help for.
    CharityCategory {
        Medical => "MEDICAL",
        Education => "EDUCATION",
        Housing => "HOUSING",
        Food => "FOOD",
        Disaster => "DISASTER",
        Orphan => "ORPHAN",
        Widow => "WIDOW",
        Mosque => "MOSQUE",
        Other => "OTHER",
    }
}

string_enum! {
    /// How pressing a request is. Ordered from least to most urgent.
    UrgencyLevel {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT" | "CRITICAL",
    }
}

impl UrgencyLevel {
    /// Sort rank, higher is more urgent.
    pub fn rank(&self) -> i64 {
        match self {
            UrgencyLevel::Low => 1,
            UrgencyLevel::Medium => 2,
            UrgencyLevel::High => 3,
            UrgencyLevel::Urgent => 4,
        }
    }
}

string_enum! {
    /// Moderation and funding state of a charity request.
    RequestStatus {
        Draft => "DRAFT",
        Pending => "PENDING",
        UnderReview => "UNDER_REVIEW",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Funded => "FUNDED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

string_enum! {
    /// Kind of halal investment project.
    ProjectCategory {
        Mosque => "MOSQUE",
        School => "SCHOOL",
        Hospital => "HOSPITAL",
        Orphanage => "ORPHANAGE",
        Water => "WATER",
        Housing => "HOUSING",
        Business => "BUSINESS",
        Other => "OTHER",
    }
}

string_enum! {
    ProjectStatus {
        Draft => "DRAFT",
        Pending => "PENDING",
        UnderReview => "UNDER_REVIEW",
        Active => "ACTIVE",
        Paused => "PAUSED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        Rejected => "REJECTED",
    }
}

string_enum! {
    /// On-chain settlement state of a donation.
    DonationStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Failed => "FAILED",
        Cancelled => "CANCELLED",
    }
}

impl DonationStatus {
    /// Whether the donation counts towards totals. Failed and cancelled
    /// donations never moved funds.
    pub fn counts(&self) -> bool {
        !matches!(self, DonationStatus::Failed | DonationStatus::Cancelled)
    }
}

string_enum! {
    NotificationKind {
        DonationReceived => "DONATION_RECEIVED",
        RequestApproved => "REQUEST_APPROVED",
        RequestRejected => "REQUEST_REJECTED",
        ProjectFunded => "PROJECT_FUNDED",
        ProjectUpdate => "PROJECT_UPDATE",
        ZakatDistributed => "ZAKAT_DISTRIBUTED",
        SystemAnnouncement => "SYSTEM_ANNOUNCEMENT",
    }
}
