use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

/// Page-number pagination parameters shared by the list endpoints.
/// The ingredient catalog deliberately does not use these.
#[derive(Deserialize, Debug, Default)]
pub struct Pagination {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn limit(&self, default_page_size: i64) -> i64 {
        match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => default_page_size,
        }
    }

    pub fn offset(&self, default_page_size: i64) -> i64 {
        let page = match self.page {
            Some(page) if page > 0 => page,
            _ => 1,
        };
        (page - 1) * self.limit(default_page_size)
    }
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub results: Vec<T>,
}
