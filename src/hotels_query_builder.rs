//!  EAN Hotel Agent
//!
//!  Copyright (C) 2026  The ean-hotel-agent authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Hotels Query Builder
//!
//! Side-effect free construction of the operation-specific query parameter
//! sets sent to the EAN API. Account parameters and the request signature
//! are appended separately, right before the call goes out.

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::hotels_session::SearchSession;

const MAX_ROOMS: u32 = 8;

// The EAN v3 REST endpoints take US-style dates.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parameters for a fresh hotel list search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelListQuery {
    pub city: String,
    pub country_code: String,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    /// Adults per room, `room1..roomN` on the wire.
    pub room_adults: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_star_rating: Option<u32>,
}

impl HotelListQuery {
    pub fn builder(
        city: String,
        country_code: String,
        arrival: NaiveDate,
        departure: NaiveDate,
    ) -> HotelListQueryBuilder {
        HotelListQueryBuilder {
            city,
            country_code,
            arrival,
            departure,
            adults: 2,
            rooms: 1,
            min_star_rating: None,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.city.is_empty(), "Destination city is required");
        ensure!(!self.country_code.is_empty(), "Country code is required");
        ensure!(
            self.departure > self.arrival,
            "Departure must be after arrival"
        );
        ensure!(
            !self.room_adults.is_empty() && self.room_adults.len() as u32 <= MAX_ROOMS,
            "Between 1 and {} rooms allowed",
            MAX_ROOMS
        );
        ensure!(
            self.room_adults.iter().all(|&adults| adults >= 1),
            "At least one adult per room is required"
        );
        if let Some(stars) = self.min_star_rating {
            ensure!(
                (1..=5).contains(&stars),
                "Star rating must be between 1 and 5"
            );
        }
        Ok(())
    }

    fn to_parameters(&self) -> Vec<(String, String)> {
        let mut parameters = vec![
            (
                "arrivalDate".to_string(),
                self.arrival.format(DATE_FORMAT).to_string(),
            ),
            (
                "departureDate".to_string(),
                self.departure.format(DATE_FORMAT).to_string(),
            ),
            ("city".to_string(), self.city.clone()),
            ("countryCode".to_string(), self.country_code.clone()),
        ];
        if let Some(stars) = self.min_star_rating {
            parameters.push(("minStarRating".to_string(), stars.to_string()));
        }
        for (i, adults) in self.room_adults.iter().enumerate() {
            parameters.push((format!("room{}", i + 1), adults.to_string()));
        }
        parameters
    }
}

#[derive(Clone)]
pub struct HotelListQueryBuilder {
    city: String,
    country_code: String,
    arrival: NaiveDate,
    departure: NaiveDate,
    adults: u32,
    rooms: u32,
    min_star_rating: Option<u32>,
}

impl HotelListQueryBuilder {
    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    pub fn rooms(mut self, rooms: u32) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn min_star_rating(mut self, stars: Option<u32>) -> Self {
        self.min_star_rating = stars;
        self
    }

    pub fn build(self) -> Result<HotelListQuery> {
        ensure!(
            self.rooms >= 1 && self.rooms <= MAX_ROOMS,
            "Between 1 and {} rooms allowed",
            MAX_ROOMS
        );
        ensure!(
            self.adults >= self.rooms,
            "At least one adult per room is required"
        );
        let query = HotelListQuery {
            city: self.city,
            country_code: self.country_code,
            arrival: self.arrival,
            departure: self.departure,
            room_adults: distribute_adults(self.adults, self.rooms),
            min_star_rating: self.min_star_rating,
        };
        query.validate()?;
        Ok(query)
    }
}

/// Spreads `adults` evenly across `rooms`; the remainder goes to the last
/// room.
pub fn distribute_adults(adults: u32, rooms: u32) -> Vec<u32> {
    if rooms <= 1 {
        return vec![adults];
    }
    let per_room = adults / rooms;
    let remainder = adults - per_room * rooms;
    let mut occupancy = vec![per_room; rooms as usize];
    if let Some(last) = occupancy.last_mut() {
        *last += remainder;
    }
    occupancy
}

/// The outgoing parameter set for a list call.
///
/// While the session holds a pagination cursor, caller-supplied filters are
/// discarded: the remote service resumes the previously started search from
/// its cache and ignores new filters anyway. Call [`SearchSession::reset`]
/// first to start a fresh search.
pub fn list_request_parameters(
    query: &HotelListQuery,
    session: &SearchSession,
) -> Vec<(String, String)> {
    match session.cursor() {
        Some(cursor) => vec![
            ("supplierType".to_string(), "E".to_string()),
            ("cacheKey".to_string(), cursor.cache_key.clone()),
            ("cacheLocation".to_string(), cursor.cache_location.clone()),
        ],
        None => query.to_parameters(),
    }
}

/// Parameters for a single-hotel room availability call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AvailabilityQuery {
    pub hotel_id: u64,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    pub adults: u32,
}

impl AvailabilityQuery {
    pub fn new(hotel_id: u64, arrival: NaiveDate, departure: NaiveDate, adults: u32) -> Result<Self> {
        ensure!(departure > arrival, "Departure must be after arrival");
        ensure!(adults >= 1, "At least one adult is required");
        Ok(Self {
            hotel_id,
            arrival,
            departure,
            adults,
        })
    }

    pub(crate) fn to_parameters(&self) -> Vec<(String, String)> {
        vec![
            ("hotelId".to_string(), self.hotel_id.to_string()),
            (
                "arrivalDate".to_string(),
                self.arrival.format(DATE_FORMAT).to_string(),
            ),
            (
                "departureDate".to_string(),
                self.departure.format(DATE_FORMAT).to_string(),
            ),
            ("room1".to_string(), self.adults.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
        )
    }

    #[test]
    fn distributes_adults_with_remainder_in_last_room() {
        assert_eq!(distribute_adults(4, 1), vec![4]);
        assert_eq!(distribute_adults(4, 2), vec![2, 2]);
        assert_eq!(distribute_adults(5, 2), vec![2, 3]);
        assert_eq!(distribute_adults(7, 3), vec![2, 2, 3]);
    }

    #[test]
    fn builds_room_occupancy_parameters() {
        let (arrival, departure) = dates();
        let query = HotelListQuery::builder("Seattle".to_string(), "US".to_string(), arrival, departure)
            .adults(5)
            .rooms(2)
            .min_star_rating(Some(3))
            .build()
            .unwrap();

        let parameters = query.to_parameters();
        assert!(parameters.contains(&("arrivalDate".to_string(), "09/10/2026".to_string())));
        assert!(parameters.contains(&("departureDate".to_string(), "09/14/2026".to_string())));
        assert!(parameters.contains(&("city".to_string(), "Seattle".to_string())));
        assert!(parameters.contains(&("countryCode".to_string(), "US".to_string())));
        assert!(parameters.contains(&("minStarRating".to_string(), "3".to_string())));
        assert!(parameters.contains(&("room1".to_string(), "2".to_string())));
        assert!(parameters.contains(&("room2".to_string(), "3".to_string())));
    }

    #[test]
    fn rejects_departure_before_arrival() {
        let (arrival, departure) = dates();
        let result = HotelListQuery::builder("Seattle".to_string(), "US".to_string(), departure, arrival)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_rooms_without_adults() {
        let (arrival, departure) = dates();
        let result = HotelListQuery::builder("Seattle".to_string(), "US".to_string(), arrival, departure)
            .adults(1)
            .rooms(2)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn continuation_discards_caller_filters() {
        let (arrival, departure) = dates();
        let query = HotelListQuery::builder("Seattle".to_string(), "US".to_string(), arrival, departure)
            .build()
            .unwrap();

        let mut session = SearchSession::new();
        session.adopt_cursor(true, Some("cache-key-1"), Some("loc-1"));

        let parameters = list_request_parameters(&query, &session);
        assert_eq!(
            parameters,
            vec![
                ("supplierType".to_string(), "E".to_string()),
                ("cacheKey".to_string(), "cache-key-1".to_string()),
                ("cacheLocation".to_string(), "loc-1".to_string()),
            ]
        );

        session.reset();
        let parameters = list_request_parameters(&query, &session);
        assert!(parameters.contains(&("city".to_string(), "Seattle".to_string())));
        assert!(!parameters.iter().any(|(k, _)| k == "cacheKey"));
    }

    #[test]
    fn availability_query_parameters() {
        let (arrival, departure) = dates();
        let query = AvailabilityQuery::new(109496, arrival, departure, 2).unwrap();
        assert_eq!(
            query.to_parameters(),
            vec![
                ("hotelId".to_string(), "109496".to_string()),
                ("arrivalDate".to_string(), "09/10/2026".to_string()),
                ("departureDate".to_string(), "09/14/2026".to_string()),
                ("room1".to_string(), "2".to_string()),
            ]
        );
    }
}
