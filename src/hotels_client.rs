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

//! # EAN Hotels Client
//!
//! Effectful (time, network) operations against the EAN hotel booking REST
//! API. Each operation issues exactly one signed GET, single attempt, no
//! retry and no backoff: a transport or decode failure propagates to the
//! caller, everything else is handled by the results parser.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};

use crate::hotels_query_builder::{AvailabilityQuery, HotelListQuery, list_request_parameters};
use crate::hotels_results_parser::{
    Hotel, Room, parse_hotel_info, parse_hotel_list, parse_room_availability, parse_room_images,
};
use crate::hotels_session::SearchSession;
use crate::signature::{Credentials, sign_parameters};

const SERVICE_URL: &str = "http://api.ean.com/ean-services/rs/hotel/";
const SERVICE_VERSION: &str = "v3";

#[derive(Clone)]
pub struct EanHotelsClient {
    client: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
}

impl EanHotelsClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_endpoint(credentials, format!("{}{}", SERVICE_URL, SERVICE_VERSION))
    }

    /// Points the client at a different service root, e.g. a local stub
    /// while testing.
    pub fn with_endpoint(credentials: Credentials, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            credentials,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch_raw(
        &self,
        method: &str,
        session: &SearchSession,
        mut parameters: Vec<(String, String)>,
    ) -> Result<String> {
        let unix_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_secs();
        sign_parameters(&self.credentials, session, &mut parameters, unix_seconds);

        let url = format!("{}/{}/", self.endpoint, method);
        tracing::info!("Fetching EAN URL: {} ({} parameters)", url, parameters.len());

        let response = self
            .client
            .get(&url)
            .query(&parameters)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("EAN API \"{}\" call encountered error: {}", method, e);
                e
            })
            .with_context(|| format!("EAN API \"{}\" request failed", method))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("EAN API \"{}\" read body", method))?;

        if !status.is_success() {
            let body_preview = body.chars().take(500).collect::<String>();
            tracing::error!("EAN API \"{}\" returned HTTP {}", method, status);
            bail!("HTTP error {} from \"{}\": {}", status, method, body_preview);
        }

        tracing::debug!("Response: {} chars, status={}", body.chars().count(), status);
        Ok(body)
    }

    /// Searches for hotels. While the session holds a pagination cursor this
    /// fetches the next page of the previously started search instead,
    /// ignoring the query's filters; call [`SearchSession::reset`] first to
    /// start over.
    pub async fn hotel_list(
        &self,
        session: &mut SearchSession,
        query: &HotelListQuery,
    ) -> Result<Vec<Hotel>> {
        let parameters = list_request_parameters(query, session);
        let body = self.fetch_raw("list", session, parameters).await?;
        parse_hotel_list(&body, session).map_err(|e| {
            tracing::error!("EAN API \"list\" call encountered error: {:#}", e);
            e
        })
    }

    /// Fetches the descriptive content of one hotel: summary, property
    /// description, images and room types.
    pub async fn hotel_info(
        &self,
        session: &mut SearchSession,
        hotel_id: u64,
    ) -> Result<Option<Hotel>> {
        let parameters = vec![("hotelId".to_string(), hotel_id.to_string())];
        let body = self.fetch_raw("info", session, parameters).await?;
        parse_hotel_info(&body, session).map_err(|e| {
            tracing::error!("EAN API \"info\" call encountered error: {:#}", e);
            e
        })
    }

    /// Back-fills room image URLs on rooms obtained from a prior
    /// [`hotel_info`](Self::hotel_info) call for the same hotel.
    pub async fn room_images(
        &self,
        session: &mut SearchSession,
        hotel_id: u64,
        rooms: &mut [Room],
    ) -> Result<()> {
        let parameters = vec![("hotelId".to_string(), hotel_id.to_string())];
        let body = self.fetch_raw("roomImages", session, parameters).await?;
        parse_room_images(&body, session, rooms).map_err(|e| {
            tracing::error!("EAN API \"roomImages\" call encountered error: {:#}", e);
            e
        })
    }

    /// Checks room availability for one hotel and date range.
    pub async fn room_availability(
        &self,
        session: &mut SearchSession,
        query: &AvailabilityQuery,
    ) -> Result<Option<Hotel>> {
        let mut parameters = query.to_parameters();
        parameters.push(("includeRoomImages".to_string(), "true".to_string()));
        parameters.push((
            "options".to_string(),
            "HOTEL_DETAILS,ROOM_TYPES,ROOM_AMENITIES,HOTEL_IMAGES".to_string(),
        ));
        let body = self.fetch_raw("avail", session, parameters).await?;
        parse_room_availability(&body, session).map_err(|e| {
            tracing::error!("EAN API \"avail\" call encountered error: {:#}", e);
            e
        })
    }
}
