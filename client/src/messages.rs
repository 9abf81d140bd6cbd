//! User-facing strings.
//!
//! Arabic is the default locale; English exists for development and tests.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported display languages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// Arabic (`ar`)
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    /// English (`en`)
    #[serde(rename = "en")]
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Self::Arabic),
            "en" => Ok(Self::English),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Localized strings for one locale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    /// Strings for `locale`
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Active locale
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Alert raised by a live `eventAdded` notification
    #[must_use]
    pub fn event_added(&self, title: &str) -> String {
        match self.locale {
            Locale::Arabic => format!("مناسبة جديدة بعنوان: {title}، أُضيفت للتو"),
            Locale::English => format!("A new event titled {title} was just added"),
        }
    }

    /// Alert raised when the subscription reports an error
    #[must_use]
    pub const fn subscription_failed(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "خطأ في جلب المناسبات الجديدة",
            Locale::English => "Error fetching new events",
        }
    }

    /// Alert after a successful booking
    #[must_use]
    pub const fn event_booked(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تم حجز المناسبة بنجاح",
            Locale::English => "Event booked successfully",
        }
    }

    /// Alert after a successful creation
    #[must_use]
    pub const fn event_created(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تم إضافة المناسبة بنجاح",
            Locale::English => "Event added successfully",
        }
    }

    /// Alert for invalid form input
    #[must_use]
    pub const fn invalid_form(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "يجب ملئ جميع الحقول بالشكل الصحيح!",
            Locale::English => "All fields must be filled in correctly!",
        }
    }

    /// Alert after a booking was cancelled
    #[must_use]
    pub const fn booking_cancelled(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تم إلغاء الحجز",
            Locale::English => "Booking cancelled",
        }
    }

    /// Alert after sign-up
    #[must_use]
    pub const fn account_created(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تم إنشاء الحساب، سجل دخولك الآن",
            Locale::English => "Account created, you can log in now",
        }
    }

    /// Title of the creation modal
    #[must_use]
    pub const fn create_title(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "إضافة مناسبة",
            Locale::English => "Add Event",
        }
    }

    /// Confirm label of the creation modal
    #[must_use]
    pub const fn confirm(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تأكيد",
            Locale::English => "Confirm",
        }
    }

    /// Cancel label of every modal
    #[must_use]
    pub const fn cancel(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "إلغاء",
            Locale::English => "Cancel",
        }
    }

    /// Title of the booking modal
    #[must_use]
    pub const fn book_title(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "حجز المناسبة",
            Locale::English => "Book Event",
        }
    }

    /// Confirm label of the booking modal
    #[must_use]
    pub const fn book(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "احجز",
            Locale::English => "Book",
        }
    }

    /// Booking confirm label shown without a session
    #[must_use]
    pub const fn login_to_book(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "سجل دخول لتحجز",
            Locale::English => "Log in to book",
        }
    }

    /// Heading of the creation call to action
    #[must_use]
    pub const fn share_events(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "شارك مناسباتك الخاصة!",
            Locale::English => "Share your own events!",
        }
    }

    /// Creation button label
    #[must_use]
    pub const fn create_event(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "إنشاء مناسبة",
            Locale::English => "Create Event",
        }
    }

    /// Heading of the events list
    #[must_use]
    pub const fn events_heading(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "المناسبات من حولك!",
            Locale::English => "Events around you!",
        }
    }

    /// Heading of the bookings list
    #[must_use]
    pub const fn bookings_heading(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "حجوزاتك",
            Locale::English => "Your bookings",
        }
    }

    /// Form labels: title, price, date, description
    #[must_use]
    pub const fn form_labels(&self) -> [&'static str; 4] {
        match self.locale {
            Locale::Arabic => ["العنوان", "السعر", "التاريخ", "التفاصيل"],
            Locale::English => ["Title", "Price", "Date", "Description"],
        }
    }

    /// Card label for the viewer's own events
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "أنت صاحب هذه المناسبة",
            Locale::English => "You are the owner of this event",
        }
    }

    /// Card action opening the detail modal
    #[must_use]
    pub const fn details(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "عرض التفاصيل",
            Locale::English => "View details",
        }
    }

    /// Spinner text
    #[must_use]
    pub const fn loading(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "جاري التحميل...",
            Locale::English => "Loading...",
        }
    }

    /// Unknown route
    #[must_use]
    pub const fn not_found(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "الصفحة غير موجودة",
            Locale::English => "Page not found",
        }
    }

    /// Login page heading
    #[must_use]
    pub const fn login_heading(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "تسجيل الدخول",
            Locale::English => "Log in",
        }
    }

    /// Sign-up page heading
    #[must_use]
    pub const fn signup_heading(&self) -> &'static str {
        match self.locale {
            Locale::Arabic => "إنشاء حساب",
            Locale::English => "Sign up",
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_added_mentions_title() {
        let ar = Messages::new(Locale::Arabic);
        assert!(ar.event_added("X").contains('X'));
        assert_eq!(ar.event_added("X"), "مناسبة جديدة بعنوان: X، أُضيفت للتو");

        let en = Messages::new(Locale::English);
        assert_eq!(en.event_added("X"), "A new event titled X was just added");
    }

    #[test]
    fn locale_parses_codes() {
        assert_eq!("ar".parse::<Locale>(), Ok(Locale::Arabic));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::English));
        assert!("fr".parse::<Locale>().is_err());
    }
}
