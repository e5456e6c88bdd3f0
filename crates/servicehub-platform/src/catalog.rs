use rust_decimal::Decimal;
use serde::Serialize;
use servicehub_core::NewServiceRequest;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Vertical {
    Cleaning,
    Healthcare,
    Education,
    Rentals,
    Freelancing,
    RawMaterials,
}

impl Vertical {
    pub fn label(self) -> &'static str {
        match self {
            Vertical::Cleaning => "Cleaning",
            Vertical::Healthcare => "Healthcare",
            Vertical::Education => "Education",
            Vertical::Rentals => "Rentals",
            Vertical::Freelancing => "Freelancing",
            Vertical::RawMaterials => "Raw Materials",
        }
    }
}

/// A bookable catalog item.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceOffering {
    pub id: &'static str,
    pub title: &'static str,
    pub vertical: Vertical,
    /// Whole currency units.
    pub base_price: i64,
}

impl ServiceOffering {
    pub fn price(&self) -> Decimal {
        Decimal::new(self.base_price, 0)
    }

    /// Booking form pre-filled with this offering; the customer supplies the rest.
    pub fn booking_form(&self) -> NewServiceRequest {
        NewServiceRequest {
            service_id: self.id.to_string(),
            service_title: self.title.to_string(),
            category: self.vertical.label().to_string(),
            total_amount: self.price(),
            ..Default::default()
        }
    }
}

pub static DEMO_CATALOG: [ServiceOffering; 8] = [
    ServiceOffering {
        id: "svc-deep-clean",
        title: "Deep Home Cleaning",
        vertical: Vertical::Cleaning,
        base_price: 2000,
    },
    ServiceOffering {
        id: "svc-plumbing",
        title: "Plumbing Repair",
        vertical: Vertical::Cleaning,
        base_price: 600,
    },
    ServiceOffering {
        id: "svc-home-nurse",
        title: "Home Nursing Visit",
        vertical: Vertical::Healthcare,
        base_price: 1500,
    },
    ServiceOffering {
        id: "svc-physio",
        title: "Physiotherapy Session",
        vertical: Vertical::Healthcare,
        base_price: 1200,
    },
    ServiceOffering {
        id: "svc-maths-tutor",
        title: "Maths Tutoring (10 hrs)",
        vertical: Vertical::Education,
        base_price: 3500,
    },
    ServiceOffering {
        id: "svc-camera-rental",
        title: "DSLR Camera Rental (per day)",
        vertical: Vertical::Rentals,
        base_price: 900,
    },
    ServiceOffering {
        id: "svc-logo-design",
        title: "Logo Design",
        vertical: Vertical::Freelancing,
        base_price: 4999,
    },
    ServiceOffering {
        id: "svc-cement-bulk",
        title: "Cement, 50 bags",
        vertical: Vertical::RawMaterials,
        base_price: 19999,
    },
];

pub fn find_offering(id: &str) -> Option<&'static ServiceOffering> {
    DEMO_CATALOG.iter().find(|offering| offering.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_vertical() {
        for vertical in [
            Vertical::Cleaning,
            Vertical::Healthcare,
            Vertical::Education,
            Vertical::Rentals,
            Vertical::Freelancing,
            Vertical::RawMaterials,
        ] {
            assert!(DEMO_CATALOG.iter().any(|o| o.vertical == vertical));
        }
    }

    #[test]
    fn test_booking_form_carries_catalog_fields() {
        let form = find_offering("svc-logo-design").unwrap().booking_form();
        assert_eq!(form.service_title, "Logo Design");
        assert_eq!(form.category, "Freelancing");
        assert_eq!(form.total_amount, Decimal::new(4999, 0));
        assert!(form.customer_name.is_empty());
    }
}
