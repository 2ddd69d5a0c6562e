use chrono::{DateTime, TimeZone, Utc};
use home_market::currency::Currency;
use home_market::models::{
    Location, Property, PropertyStatus, PropertyType, Seller, Specifications, Tier, Verification,
};

/// Builder for test listings
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            property: Property {
                id: id.to_string(),
                title: "3 bedroom house in East Legon".to_string(),
                description: "Spacious family home with a large compound.".to_string(),
                price: 850_000.0,
                currency: Currency::Ghs,
                status: PropertyStatus::ForSale,
                property_type: PropertyType::House,
                location: Location {
                    address: "14 Lagos Avenue".to_string(),
                    city: "Accra".to_string(),
                    region: "Greater Accra".to_string(),
                    country: "Ghana".to_string(),
                    coordinates: None,
                },
                specifications: Specifications {
                    bedrooms: Some(3),
                    bathrooms: Some(2),
                    size: Some(250.0),
                    ..Default::default()
                },
                images: vec!["https://cdn.example/east-legon-1.jpg".to_string()],
                seller: Seller {
                    id: "agent-1".to_string(),
                    name: "Ama Mensah".to_string(),
                    phone: "024 123 4567".to_string(),
                    verified: true,
                },
                verification: Verification::default(),
                tier: Tier::Normal,
                features: vec!["Borehole".to_string(), "Gated".to_string()],
                created_at: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
                expires_at: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.property.title = title.to_string();
        self
    }

    pub fn price(mut self, price: f64, currency: Currency) -> Self {
        self.property.price = price;
        self.property.currency = currency;
        self
    }

    pub fn status(mut self, status: PropertyStatus) -> Self {
        self.property.status = status;
        self
    }

    pub fn kind(mut self, kind: PropertyType) -> Self {
        self.property.property_type = kind;
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.property.location.city = city.to_string();
        self
    }

    pub fn no_images(mut self) -> Self {
        self.property.images.clear();
        self
    }

    pub fn seller_phone(mut self, phone: &str) -> Self {
        self.property.seller.phone = phone.to_string();
        self
    }

    pub fn premium(mut self) -> Self {
        self.property.tier = Tier::Premium;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.property.created_at = at;
        self
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.property.expires_at = Some(at);
        self
    }

    pub fn build(self) -> Property {
        self.property
    }
}
