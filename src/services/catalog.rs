use crate::errors::BookingError;
use crate::models::Service;

pub const MAX_SEARCH_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceGroup {
    pub category_name: String,
    pub services: Vec<Service>,
}

/// Groups by `category_name` in first-encounter order.
pub fn group_services_by_category(services: &[Service]) -> Vec<ServiceGroup> {
    let mut groups: Vec<ServiceGroup> = Vec::new();

    for service in services {
        match groups
            .iter_mut()
            .find(|g| g.category_name == service.category_name)
        {
            Some(group) => group.services.push(service.clone()),
            None => groups.push(ServiceGroup {
                category_name: service.category_name.clone(),
                services: vec![service.clone()],
            }),
        }
    }

    groups
}

/// Trims the search text and enforces the length limit.
pub fn normalize_search(search: &str) -> Result<String, BookingError> {
    let trimmed = search.trim();
    if trimmed.chars().count() > MAX_SEARCH_CHARS {
        return Err(BookingError::InvalidSearch(format!(
            "Use no maximo {MAX_SEARCH_CHARS} caracteres."
        )));
    }
    Ok(trimmed.to_string())
}
