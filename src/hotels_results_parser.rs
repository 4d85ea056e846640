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

//! # Hotels Results Parser
//!
//! Side-effect free JSON parsing for the EAN hotel API. Each response is a
//! fixed top-level envelope wrapping an XML-derived schema (`@`-prefixed
//! attribute keys, numbers serialized as strings). The envelope is
//! deserialized into a typed intermediate schema with optional fields
//! modeled explicitly, then mapped into display-oriented [`Hotel`] and
//! [`Room`] records.
//!
//! Error taxonomy: a JSON decode failure is returned to the caller; a body
//! missing its envelope key, or a well-formed `EanWsError`, is logged and
//! yields an empty result. At this layer "nothing found" and "remote error"
//! look the same to callers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hotels_session::SearchSession;

/// Relative thumbnail paths from list responses are served from here.
const IMAGE_BASE: &str = "http://media.expedia.com";

/// Hard cap on property images kept from info/availability responses.
const MAX_HOTEL_IMAGES: usize = 11;

/// One bookable room type of a hotel. Created while parsing an
/// info/availability response; `image_url` may be back-filled later from a
/// separate room-images call, matched by `type_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Room {
    pub id: String,
    pub type_code: Option<String>,
    /// Short description.
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// A display-oriented hotel record. Owns its rooms exclusively; rooms hold
/// no back-reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Hotel {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// `"<currencyCode> <total>"`, aggregated from the nested rate block.
    pub total_rate: Option<String>,
    #[serde(default)]
    pub value_adds: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Hotel {
    fn new(id: u64, name: &str, address: &str, rating: Option<f64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            address: address.to_string(),
            rating,
            city: String::new(),
            province: String::new(),
            post_code: String::new(),
            latitude: None,
            longitude: None,
            image_url: None,
            description: None,
            total_rate: None,
            value_adds: Vec::new(),
            images: Vec::new(),
            rooms: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed intermediate schema. Unknown fields are ignored; fields the remote
// service may omit are `Option`.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EanWsError {
    handling: Option<String>,
    category: Option<String>,
    #[serde(rename = "verboseMessage")]
    verbose_message: Option<String>,
}

fn log_remote_error(operation: &str, error: &EanWsError) {
    tracing::error!(
        "EAN \"{}\" reported error: {} - {}: {}",
        operation,
        error.handling.as_deref().unwrap_or("?"),
        error.category.as_deref().unwrap_or("?"),
        error.verbose_message.as_deref().unwrap_or("")
    );
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(rename = "HotelListResponse")]
    hotel_list_response: Option<HotelListResponse>,
}

#[derive(Debug, Deserialize)]
struct HotelListResponse {
    #[serde(rename = "customerSessionId")]
    customer_session_id: Option<String>,
    #[serde(rename = "EanWsError")]
    error: Option<EanWsError>,
    #[serde(rename = "cacheKey")]
    cache_key: Option<String>,
    #[serde(rename = "cacheLocation")]
    cache_location: Option<String>,
    #[serde(rename = "moreResultsAvailable")]
    more_results_available: Option<bool>,
    #[serde(rename = "HotelList")]
    hotel_list: Option<HotelList>,
}

#[derive(Debug, Deserialize)]
struct HotelList {
    #[serde(rename = "@size")]
    size: Option<String>,
    #[serde(rename = "@activePropertyCount")]
    active_property_count: Option<String>,
    #[serde(rename = "HotelSummary", default)]
    hotel_summary: Vec<HotelSummary>,
}

#[derive(Debug, Deserialize)]
struct HotelSummary {
    #[serde(rename = "hotelId")]
    hotel_id: u64,
    name: String,
    address1: String,
    #[serde(rename = "hotelRating")]
    hotel_rating: Option<f64>,
    city: Option<String>,
    #[serde(rename = "stateProvinceCode")]
    state_province_code: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    #[serde(rename = "thumbNailUrl")]
    thumb_nail_url: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(rename = "RoomRateDetailsList")]
    room_rate_details_list: Option<RoomRateDetailsList>,
}

#[derive(Debug, Deserialize)]
struct RoomRateDetailsList {
    #[serde(rename = "RoomRateDetails")]
    room_rate_details: Option<RoomRateDetails>,
}

#[derive(Debug, Deserialize)]
struct RoomRateDetails {
    #[serde(rename = "roomDescription")]
    room_description: Option<String>,
    #[serde(rename = "RateInfos")]
    rate_infos: Option<RateInfos>,
    #[serde(rename = "ValueAdds")]
    value_adds: Option<ValueAdds>,
}

#[derive(Debug, Deserialize)]
struct RateInfos {
    #[serde(rename = "RateInfo")]
    rate_info: Option<RateInfo>,
}

#[derive(Debug, Deserialize)]
struct RateInfo {
    #[serde(rename = "ChargeableRateInfo")]
    chargeable_rate_info: Option<ChargeableRateInfo>,
}

#[derive(Debug, Deserialize)]
struct ChargeableRateInfo {
    #[serde(rename = "@currencyCode")]
    currency_code: Option<String>,
    #[serde(rename = "@total")]
    total: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueAdds {
    #[serde(rename = "ValueAdd", default)]
    value_add: Vec<ValueAdd>,
}

#[derive(Debug, Deserialize)]
struct ValueAdd {
    description: String,
}

#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    #[serde(rename = "HotelInformationResponse")]
    hotel_information_response: Option<HotelInformationResponse>,
}

#[derive(Debug, Deserialize)]
struct HotelInformationResponse {
    #[serde(rename = "customerSessionId")]
    customer_session_id: Option<String>,
    #[serde(rename = "EanWsError")]
    error: Option<EanWsError>,
    #[serde(rename = "HotelSummary")]
    hotel_summary: Option<HotelSummary>,
    #[serde(rename = "HotelDetails")]
    hotel_details: Option<HotelDetails>,
    #[serde(rename = "HotelImages")]
    hotel_images: Option<HotelImages>,
    #[serde(rename = "RoomTypes")]
    room_types: Option<RoomTypes>,
}

#[derive(Debug, Deserialize)]
struct HotelDetails {
    #[serde(rename = "propertyDescription")]
    property_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HotelImages {
    #[serde(rename = "HotelImage", default)]
    hotel_image: Vec<HotelImage>,
}

#[derive(Debug, Deserialize)]
struct HotelImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RoomTypes {
    #[serde(rename = "RoomType", default)]
    room_type: Vec<RoomType>,
}

#[derive(Debug, Deserialize)]
struct RoomType {
    #[serde(rename = "@roomTypeId")]
    room_type_id: String,
    #[serde(rename = "@roomCode")]
    room_code: Option<String>,
    description: String,
    #[serde(rename = "descriptionLong")]
    description_long: Option<String>,
    #[serde(rename = "roomAmenities")]
    room_amenities: Option<RoomAmenities>,
}

#[derive(Debug, Deserialize)]
struct RoomAmenities {
    #[serde(rename = "RoomAmenity", default)]
    room_amenity: Vec<RoomAmenity>,
}

#[derive(Debug, Deserialize)]
struct RoomAmenity {
    amenity: String,
}

#[derive(Debug, Deserialize)]
struct RoomImagesEnvelope {
    #[serde(rename = "HotelRoomImageResponse")]
    hotel_room_image_response: Option<HotelRoomImageResponse>,
}

#[derive(Debug, Deserialize)]
struct HotelRoomImageResponse {
    #[serde(rename = "customerSessionId")]
    customer_session_id: Option<String>,
    #[serde(rename = "EanWsError")]
    error: Option<EanWsError>,
    #[serde(rename = "RoomImages")]
    room_images: Option<RoomImages>,
}

#[derive(Debug, Deserialize)]
struct RoomImages {
    #[serde(rename = "RoomImage", default)]
    room_image: Vec<RoomImage>,
}

#[derive(Debug, Deserialize)]
struct RoomImage {
    #[serde(rename = "roomTypeCode")]
    room_type_code: i64,
    url: String,
}

#[derive(Debug, Deserialize)]
struct AvailabilityEnvelope {
    #[serde(rename = "HotelRoomAvailabilityResponse")]
    hotel_room_availability_response: Option<HotelRoomAvailabilityResponse>,
}

#[derive(Debug, Deserialize)]
struct HotelRoomAvailabilityResponse {
    #[serde(rename = "customerSessionId")]
    customer_session_id: Option<String>,
    #[serde(rename = "EanWsError")]
    error: Option<EanWsError>,
    #[serde(rename = "hotelId")]
    hotel_id: Option<u64>,
    #[serde(rename = "hotelName")]
    hotel_name: Option<String>,
    #[serde(rename = "hotelAddress")]
    hotel_address: Option<String>,
    #[serde(rename = "hotelCity")]
    hotel_city: Option<String>,
    #[serde(rename = "hotelStateProvince")]
    hotel_state_province: Option<String>,
    #[serde(rename = "HotelDetails")]
    hotel_details: Option<HotelDetails>,
    #[serde(rename = "HotelImages")]
    hotel_images: Option<HotelImages>,
    #[serde(rename = "HotelRoomResponse")]
    hotel_room_response: Option<HotelRoomResponse>,
}

#[derive(Debug, Deserialize)]
struct HotelRoomResponse {
    #[serde(rename = "RoomType")]
    room_type: Option<RoomType>,
    #[serde(rename = "RoomImages")]
    room_images: Option<RoomImages>,
}

// ---------------------------------------------------------------------------
// Mapping into domain records
// ---------------------------------------------------------------------------

fn hotel_from_summary(summary: &HotelSummary) -> Hotel {
    let mut hotel = Hotel::new(
        summary.hotel_id,
        &summary.name,
        &summary.address1,
        summary.hotel_rating,
    );
    hotel.city = summary.city.clone().unwrap_or_default();
    if let Some(province) = &summary.state_province_code {
        hotel.province = province.clone();
    }
    if let Some(post_code) = &summary.postal_code {
        hotel.post_code = post_code.clone();
    }
    hotel.image_url = summary
        .thumb_nail_url
        .as_ref()
        .map(|path| format!("{}{}", IMAGE_BASE, path));
    hotel.latitude = summary.latitude;
    hotel.longitude = summary.longitude;

    if let Some(details) = summary
        .room_rate_details_list
        .as_ref()
        .and_then(|list| list.room_rate_details.as_ref())
    {
        hotel.description = details.room_description.clone();
        if let Some(rate) = details
            .rate_infos
            .as_ref()
            .and_then(|infos| infos.rate_info.as_ref())
            .and_then(|info| info.chargeable_rate_info.as_ref())
        {
            if let (Some(currency), Some(total)) = (&rate.currency_code, &rate.total) {
                hotel.total_rate = Some(format!("{} {}", currency, total));
            }
        }
        if let Some(value_adds) = &details.value_adds {
            hotel.value_adds = value_adds
                .value_add
                .iter()
                .map(|v| v.description.clone())
                .collect();
        }
    }
    hotel
}

fn room_from_type(room_type: &RoomType) -> Room {
    Room {
        id: room_type.room_type_id.clone(),
        type_code: room_type.room_code.clone(),
        name: room_type.description.clone(),
        // The long description supersedes the short one when present.
        description: Some(
            room_type
                .description_long
                .clone()
                .unwrap_or_else(|| room_type.description.clone()),
        ),
        image_url: None,
        amenities: room_type
            .room_amenities
            .as_ref()
            .map(|a| a.room_amenity.iter().map(|r| r.amenity.clone()).collect())
            .unwrap_or_default(),
    }
}

fn capped_images(images: &HotelImages) -> Vec<String> {
    images
        .hotel_image
        .iter()
        .take(MAX_HOTEL_IMAGES)
        .map(|image| image.url.clone())
        .collect()
}

fn unescape_description(description: &str) -> String {
    html_escape::decode_html_entities(description).into_owned()
}

/// Parses a `HotelListResponse` body, updating the session's token and
/// pagination cursor as a side effect on the passed-in state.
pub fn parse_hotel_list(body: &str, session: &mut SearchSession) -> Result<Vec<Hotel>> {
    let envelope: ListEnvelope =
        serde_json::from_str(body).context("Decode hotel list response")?;
    let Some(response) = envelope.hotel_list_response else {
        tracing::error!("Unexpected response: missing HotelListResponse envelope");
        return Ok(Vec::new());
    };
    if let Some(id) = &response.customer_session_id {
        session.adopt_session_id(id);
    }
    if let Some(error) = &response.error {
        log_remote_error("list", error);
        return Ok(Vec::new());
    }
    let Some(hotel_list) = &response.hotel_list else {
        return Ok(Vec::new());
    };

    session.adopt_cursor(
        response.more_results_available.unwrap_or(false),
        response.cache_key.as_deref(),
        response.cache_location.as_deref(),
    );

    tracing::debug!(
        "Hotels found: {}/{}",
        hotel_list.size.as_deref().unwrap_or("?"),
        hotel_list.active_property_count.as_deref().unwrap_or("?")
    );

    Ok(hotel_list.hotel_summary.iter().map(hotel_from_summary).collect())
}

/// Parses a `HotelInformationResponse` body into a single hotel with its
/// room types. The property description has its HTML entities unescaped; at
/// most the first 11 property images are kept.
pub fn parse_hotel_info(body: &str, session: &mut SearchSession) -> Result<Option<Hotel>> {
    let envelope: InfoEnvelope =
        serde_json::from_str(body).context("Decode hotel information response")?;
    let Some(response) = envelope.hotel_information_response else {
        tracing::error!("Unexpected response: missing HotelInformationResponse envelope");
        return Ok(None);
    };
    if let Some(id) = &response.customer_session_id {
        session.adopt_session_id(id);
    }
    if let Some(error) = &response.error {
        log_remote_error("info", error);
        return Ok(None);
    }
    let Some(summary) = &response.hotel_summary else {
        return Ok(None);
    };

    let mut hotel = Hotel::new(
        summary.hotel_id,
        &summary.name,
        &summary.address1,
        summary.hotel_rating,
    );
    hotel.latitude = summary.latitude;
    hotel.longitude = summary.longitude;

    if let Some(description) = response
        .hotel_details
        .as_ref()
        .and_then(|details| details.property_description.as_deref())
    {
        hotel.description = Some(unescape_description(description));
    }

    if let Some(images) = &response.hotel_images {
        hotel.images = capped_images(images);
    }

    if let Some(room_types) = &response.room_types {
        hotel.rooms = room_types.room_type.iter().map(room_from_type).collect();
    }

    Ok(Some(hotel))
}

/// Parses a `HotelRoomImageResponse` body and back-fills the image URL of
/// previously built rooms, matched by numeric equality between the image's
/// room-type code and each room's stored type code.
///
/// One image goes to the first matching room; a later image with the same
/// type code overwrites the earlier URL.
pub fn parse_room_images(
    body: &str,
    session: &mut SearchSession,
    rooms: &mut [Room],
) -> Result<()> {
    let envelope: RoomImagesEnvelope =
        serde_json::from_str(body).context("Decode room image response")?;
    let Some(response) = envelope.hotel_room_image_response else {
        tracing::error!("Unexpected response: missing HotelRoomImageResponse envelope");
        return Ok(());
    };
    if let Some(id) = &response.customer_session_id {
        session.adopt_session_id(id);
    }
    if let Some(error) = &response.error {
        log_remote_error("roomImages", error);
        return Ok(());
    }
    let Some(images) = &response.room_images else {
        return Ok(());
    };

    for image in &images.room_image {
        tracing::debug!("roomTypeCode: {}, url: {}", image.room_type_code, image.url);
        let matching = rooms.iter_mut().find(|room| {
            room.type_code
                .as_deref()
                .and_then(|code| code.trim().parse::<i64>().ok())
                == Some(image.room_type_code)
        });
        if let Some(room) = matching {
            room.image_url = Some(image.url.clone());
        }
    }
    Ok(())
}

/// Parses a `HotelRoomAvailabilityResponse` body: one hotel built from the
/// top-level fields, at most one room, at most one room image.
pub fn parse_room_availability(body: &str, session: &mut SearchSession) -> Result<Option<Hotel>> {
    let envelope: AvailabilityEnvelope =
        serde_json::from_str(body).context("Decode room availability response")?;
    let Some(response) = envelope.hotel_room_availability_response else {
        tracing::error!("Unexpected response: missing HotelRoomAvailabilityResponse envelope");
        return Ok(None);
    };
    if let Some(id) = &response.customer_session_id {
        session.adopt_session_id(id);
    }
    if let Some(error) = &response.error {
        log_remote_error("avail", error);
        return Ok(None);
    }
    let (Some(hotel_id), Some(name), Some(address)) = (
        response.hotel_id,
        response.hotel_name.as_deref(),
        response.hotel_address.as_deref(),
    ) else {
        return Ok(None);
    };

    let mut hotel = Hotel::new(hotel_id, name, address, None);
    hotel.city = response.hotel_city.clone().unwrap_or_default();
    hotel.province = response.hotel_state_province.clone().unwrap_or_default();

    if let Some(description) = response
        .hotel_details
        .as_ref()
        .and_then(|details| details.property_description.as_deref())
    {
        hotel.description = Some(unescape_description(description));
    }

    if let Some(images) = &response.hotel_images {
        hotel.images = capped_images(images);
    }

    if let Some(room_response) = &response.hotel_room_response {
        if let Some(room_type) = &room_response.room_type {
            let mut room = room_from_type(room_type);
            // Only the first room image is kept; the rest are discarded.
            if let Some(first) = room_response
                .room_images
                .as_ref()
                .and_then(|images| images.room_image.first())
            {
                room.image_url = Some(first.url.clone());
            }
            hotel.rooms.push(room);
        }
    }

    Ok(Some(hotel))
}
