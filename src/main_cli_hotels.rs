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
//!
//! # Examples
//!
//! Credentials come from `--cid`, `--api-key` and `--secret`, or from the
//! `EAN_CID`, `EAN_API_KEY` and `EAN_SECRET` environment variables.
//!
//! ## Hotel search
//!
//! ```bash
//! ean-hotels list -d "Seattle,US" -i 09/10/2026 -o 09/14/2026 -a 2
//! ```
//!
//! ## Follow the pagination cursor for up to three pages
//!
//! ```bash
//! ean-hotels list -d "Paris,FR" -i 09/10/2026 -o 09/14/2026 --pages 3
//! ```
//!
//! ## Hotel content with room images
//!
//! ```bash
//! ean-hotels info 109496
//! ```
//!
//! ## Room availability
//!
//! ```bash
//! ean-hotels avail 109496 -i 09/10/2026 -o 09/14/2026 -a 2
//! ```

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ean_hotel_agent::{
    AvailabilityQuery, Credentials, EanHotelsClient, Hotel, HotelListQuery, SearchSession,
};

#[derive(Parser, Debug)]
#[command(name = "ean-hotels")]
#[command(version = "0.1.0")]
#[command(about = "Query the EAN hotel booking API")]
struct Cli {
    #[command(flatten)]
    account: AccountArgs,
    #[arg(long, global = true, help = "Print domain records as JSON")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long, global = true, help = "Account id (falls back to EAN_CID)")]
    cid: Option<String>,
    #[arg(long, global = true, help = "API key (falls back to EAN_API_KEY)")]
    api_key: Option<String>,
    #[arg(long, global = true, help = "Shared secret (falls back to EAN_SECRET)")]
    secret: Option<String>,
    #[arg(long, global = true, default_value = "en_US")]
    locale: String,
    #[arg(short = 'C', long, global = true, default_value = "USD")]
    currency: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search hotels in a destination
    List {
        #[arg(short = 'd', long, help = "Destination as \"City,CountryCode\"")]
        destination: String,
        #[arg(short = 'i', long)]
        checkin: String,
        #[arg(short = 'o', long)]
        checkout: String,
        #[arg(short = 'a', long, default_value = "2")]
        adults: u32,
        #[arg(short = 'r', long, default_value = "1")]
        rooms: u32,
        #[arg(long, help = "Minimum star rating (1-5)")]
        min_star: Option<u32>,
        #[arg(long, default_value = "1", help = "Pages to fetch before stopping")]
        pages: u32,
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Fetch descriptive content for one hotel
    Info {
        hotel_id: u64,
        #[arg(long, help = "Skip the room-images back-fill call")]
        skip_room_images: bool,
    },
    /// Check room availability for one hotel
    Avail {
        hotel_id: u64,
        #[arg(short = 'i', long)]
        checkin: String,
        #[arg(short = 'o', long)]
        checkout: String,
        #[arg(short = 'a', long, default_value = "2")]
        adults: u32,
    },
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| anyhow::anyhow!("Invalid date: {}", s))
}

fn flag_or_env(flag: Option<String>, var: &str, what: &str) -> Result<String> {
    if let Some(value) = flag {
        return Ok(value);
    }
    std::env::var(var).with_context(|| format!("{} missing: pass the flag or set {}", what, var))
}

fn credentials(account: AccountArgs) -> Result<Credentials> {
    let cid = flag_or_env(account.cid, "EAN_CID", "Account id")?;
    let api_key = flag_or_env(account.api_key, "EAN_API_KEY", "API key")?;
    let secret = flag_or_env(account.secret, "EAN_SECRET", "Shared secret")?;
    Ok(Credentials::new(cid, api_key, secret)
        .locale(account.locale)
        .currency_code(account.currency))
}

fn print_hotel_summary(index: usize, hotel: &Hotel) {
    println!("{}. {} (id {})", index + 1, hotel.name, hotel.id);
    if let Some(rating) = hotel.rating {
        println!("   Rating: {:.1}", rating);
    }
    let mut place = hotel.address.clone();
    for part in [&hotel.city, &hotel.province, &hotel.post_code] {
        if !part.is_empty() {
            place.push_str(", ");
            place.push_str(part);
        }
    }
    println!("   {}", place);
    if let Some(rate) = &hotel.total_rate {
        println!("   Total: {}", rate);
    }
    if let Some(description) = &hotel.description {
        println!("   {}", description);
    }
    for value_add in &hotel.value_adds {
        println!("   + {}", value_add);
    }
}

fn print_hotel_content(hotel: &Hotel) {
    println!("{} (id {})", hotel.name, hotel.id);
    if let Some(rating) = hotel.rating {
        println!("Rating: {:.1}", rating);
    }
    println!("Address: {}", hotel.address);
    if let (Some(lat), Some(lon)) = (hotel.latitude, hotel.longitude) {
        println!("Coordinates: {}, {}", lat, lon);
    }
    if let Some(description) = &hotel.description {
        println!("\n{}\n", description);
    }
    if !hotel.images.is_empty() {
        println!("Images ({}):", hotel.images.len());
        for url in &hotel.images {
            println!("  {}", url);
        }
    }
    if !hotel.rooms.is_empty() {
        println!("\nRooms:");
        for room in &hotel.rooms {
            println!("- {}", room.name);
            if let Some(description) = &room.description {
                if description != &room.name {
                    println!("  {}", description);
                }
            }
            if let Some(url) = &room.image_url {
                println!("  Image: {}", url);
            }
            if !room.amenities.is_empty() {
                println!("  Amenities: {}", room.amenities.join(", "));
            }
        }
    }
}

async fn run_list(
    client: &EanHotelsClient,
    session: &mut SearchSession,
    query: &HotelListQuery,
    pages: u32,
    limit: usize,
    json: bool,
) -> Result<()> {
    let mut all_hotels = Vec::new();
    for page in 1..=pages.max(1) {
        let hotels = client.hotel_list(session, query).await?;
        if !json {
            if hotels.is_empty() {
                if page == 1 {
                    println!("No hotels found.");
                }
            } else {
                println!("--- Page {} ({} hotels) ---", page, hotels.len());
                for (i, hotel) in hotels.iter().take(limit).enumerate() {
                    print_hotel_summary(i, hotel);
                }
            }
        }
        all_hotels.extend(hotels);
        if !session.paging() {
            break;
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&all_hotels)?);
    } else if session.paging() {
        println!("More results are available.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let client = EanHotelsClient::new(credentials(cli.account)?)?;
    let mut session = SearchSession::new();

    match cli.command {
        Command::List {
            destination,
            checkin,
            checkout,
            adults,
            rooms,
            min_star,
            pages,
            limit,
        } => {
            let Some((city, country_code)) = destination.split_once(',') else {
                bail!("Destination must be \"City,CountryCode\", got: {}", destination);
            };
            let query = HotelListQuery::builder(
                city.trim().to_string(),
                country_code.trim().to_string(),
                parse_date(&checkin)?,
                parse_date(&checkout)?,
            )
            .adults(adults)
            .rooms(rooms)
            .min_star_rating(min_star)
            .build()?;

            run_list(&client, &mut session, &query, pages, limit, json).await?;
        }
        Command::Info {
            hotel_id,
            skip_room_images,
        } => {
            let Some(mut hotel) = client.hotel_info(&mut session, hotel_id).await? else {
                println!("No hotel found for id {}.", hotel_id);
                return Ok(());
            };
            if !skip_room_images {
                client
                    .room_images(&mut session, hotel_id, &mut hotel.rooms)
                    .await?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&hotel)?);
            } else {
                print_hotel_content(&hotel);
            }
        }
        Command::Avail {
            hotel_id,
            checkin,
            checkout,
            adults,
        } => {
            let query = AvailabilityQuery::new(
                hotel_id,
                parse_date(&checkin)?,
                parse_date(&checkout)?,
                adults,
            )?;
            let Some(hotel) = client.room_availability(&mut session, &query).await? else {
                println!("No availability for hotel {}.", hotel_id);
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&hotel)?);
            } else {
                print_hotel_content(&hotel);
            }
        }
    }
    Ok(())
}
