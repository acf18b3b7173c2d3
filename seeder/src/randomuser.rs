use color_eyre::Result;
use serde::Deserialize;

use crate::config::RandomUserConfig;

#[derive(Deserialize, Debug)]
pub(crate) struct RandomUserResponse {
    pub results: Vec<Person>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Person {
    pub name: Name,
    pub dob: Dob,
    pub gender: String,
    pub nat: String,
    pub location: Location,
    pub email: String,
    pub phone: String,
    pub cell: String,
    pub picture: Picture,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Name {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Dob {
    pub date: String,
    pub age: i32,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Location {
    pub street: Street,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postcode: Postcode,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Street {
    pub number: i64,
    pub name: String,
}

/// randomuser.me returns postcodes as strings for some nationalities and
/// bare numbers for others.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub(crate) enum Postcode {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for Postcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Postcode::Text(text) => write!(f, "{text}"),
            Postcode::Number(number) => write!(f, "{number}"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}

/// One GET, no retry. A non-2xx status is logged and treated as an empty
/// batch so the pipeline loads nothing; transport and decode errors
/// propagate to the caller.
#[tracing::instrument(skip(client, config), err)]
pub(crate) async fn fetch_people(
    client: &reqwest::Client,
    config: &RandomUserConfig,
    count: usize,
) -> Result<Vec<Person>> {
    let url = format!(
        "{}/?nat={}&results={count}",
        config.base_url, config.nationality
    );

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        tracing::warn!(status = %response.status(), "randomuser.me returned a non-success status");
        return Ok(Vec::new());
    }

    let body: RandomUserResponse = response.json().await?;

    tracing::info!(fetched = body.results.len(), "Fetched people");

    Ok(body.results)
}

#[cfg(test)]
pub(crate) const SAMPLE_PERSON: &str = r#"{
        "name": {"title": "Ms", "first": "Asha", "last": "Rao"},
        "dob": {"date": "1990-04-12T07:33:51.396Z", "age": 35},
        "gender": "female",
        "nat": "IN",
        "location": {
            "street": {"number": 42, "name": "MG Road"},
            "city": "Pune",
            "state": "Maharashtra",
            "country": "India",
            "postcode": 411001
        },
        "email": "asha.rao@example.com",
        "phone": "020-1234-5678",
        "cell": "98765-43210",
        "picture": {
            "large": "https://example.com/large.jpg",
            "medium": "https://example.com/medium.jpg",
            "thumbnail": "https://example.com/thumb.jpg"
        }
    }"#;

#[cfg(test)]
pub(crate) fn sample_person() -> Person {
    serde_json::from_str(SAMPLE_PERSON).unwrap()
}
