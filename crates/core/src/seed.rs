//! Default collections shown before an admin edits anything.
//!
//! A fresh profile has no stored services or highlights; readers fall back to
//! these until the first write persists a real collection.

use chrono::{DateTime, Duration, Utc};

use crate::types::{HighlightIcon, HighlightId, Service, ServiceHighlight, ServiceId};

/// Days from the Unix epoch to 2024-01-01.
const SEED_EPOCH_DAYS: i64 = 19_723;

fn seed_date(day_offset: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(SEED_EPOCH_DAYS + day_offset)
}

fn features(list: &[&str]) -> Vec<String> {
    list.iter().map(|f| (*f).to_string()).collect()
}

/// The four services every new profile starts with.
#[must_use]
pub fn default_services() -> Vec<Service> {
    vec![
        Service {
            id: ServiceId::new("1"),
            title: "Boundary Walls".to_string(),
            description: "Complete boundary wall construction with precast concrete, brick, and RCC options".to_string(),
            price: "₹150/sq ft onwards".to_string(),
            image_url: "https://images.pexels.com/photos/1546166/pexels-photo-1546166.jpeg?auto=compress&cs=tinysrgb&w=800&h=600&fit=crop".to_string(),
            features: features(&["Precast Concrete", "Brick Construction", "RCC Walls", "Custom Heights"]),
            category: "Construction".to_string(),
            is_highlighted: true,
            created_at: seed_date(0),
            updated_at: seed_date(0),
        },
        Service {
            id: ServiceId::new("2"),
            title: "Garden Benches".to_string(),
            description: "Durable and comfortable concrete benches for parks, gardens, and public spaces".to_string(),
            price: "₹2,500/piece onwards".to_string(),
            image_url: "https://images.pexels.com/photos/1108572/pexels-photo-1108572.jpeg?auto=compress&cs=tinysrgb&w=800&h=600&fit=crop".to_string(),
            features: features(&["Weather Resistant", "Multiple Designs", "Custom Sizes", "Easy Installation"]),
            category: "Furniture".to_string(),
            is_highlighted: false,
            created_at: seed_date(1),
            updated_at: seed_date(1),
        },
        Service {
            id: ServiceId::new("3"),
            title: "Fencing Poles".to_string(),
            description: "High-quality concrete fencing poles for secure and long-lasting boundaries".to_string(),
            price: "₹180/piece onwards".to_string(),
            image_url: "https://images.pexels.com/photos/1438832/pexels-photo-1438832.jpeg?auto=compress&cs=tinysrgb&w=800&h=600&fit=crop".to_string(),
            features: features(&["Pre-stressed Concrete", "Various Heights", "Corner Posts", "Gate Posts"]),
            category: "Fencing".to_string(),
            is_highlighted: false,
            created_at: seed_date(2),
            updated_at: seed_date(2),
        },
        Service {
            id: ServiceId::new("4"),
            title: "Custom Solutions".to_string(),
            description: "Tailored concrete solutions for your specific construction needs".to_string(),
            price: "Quote on Request".to_string(),
            image_url: "https://images.pexels.com/photos/1396122/pexels-photo-1396122.jpeg?auto=compress&cs=tinysrgb&w=800&h=600&fit=crop".to_string(),
            features: features(&["Site Survey", "Custom Design", "Quality Materials", "Professional Installation"]),
            category: "Custom".to_string(),
            is_highlighted: false,
            created_at: seed_date(3),
            updated_at: seed_date(3),
        },
    ]
}

/// The four highlights every new profile starts with.
#[must_use]
pub fn default_highlights() -> Vec<ServiceHighlight> {
    let highlight =
        |id: &str, title: &str, description: &str, icon: HighlightIcon, order: i32| {
            ServiceHighlight {
                id: HighlightId::new(id),
                title: title.to_string(),
                description: description.to_string(),
                icon,
                is_active: true,
                order,
            }
        };

    vec![
        highlight(
            "1",
            "No Delivery Charges",
            "Free delivery to your location within our service area",
            HighlightIcon::Truck,
            1,
        ),
        highlight(
            "2",
            "No Installation Charges",
            "Professional installation included in the price",
            HighlightIcon::Wrench,
            2,
        ),
        highlight(
            "3",
            "Quick Delivery",
            "Fast turnaround time for all orders",
            HighlightIcon::Clock,
            3,
        ),
        highlight(
            "4",
            "Quality Guarantee",
            "Premium materials with assured quality",
            HighlightIcon::Shield,
            4,
        ),
    ]
}
