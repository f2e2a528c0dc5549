//! CSV dataset parsing.
//!
//! The dataset is a fixed-format file with a header row and one room
//! per line. Fields never contain commas, so a plain split is enough;
//! amenities are a `;`-separated list inside a single field.

use thiserror::Error;

use roomscout_core::RoomListing;

const FIELD_COUNT: usize = 11;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset row {line} has {found} fields, expected {FIELD_COUNT}")]
    FieldCount { line: usize, found: usize },
    #[error("dataset row {line}: invalid {field}: {value:?}")]
    InvalidField { line: usize, field: &'static str, value: String },
}

/// Parses the raw CSV text. The first line is the header; blank lines
/// are skipped.
pub fn parse_dataset(raw: &str) -> Result<Vec<RoomListing>, DatasetError> {
    let mut listings = Vec::new();

    for (index, line) in raw.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        listings.push(parse_row(index + 1, line)?);
    }

    Ok(listings)
}

fn parse_row(line: usize, row: &str) -> Result<RoomListing, DatasetError> {
    let fields: Vec<&str> = row.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(DatasetError::FieldCount { line, found: fields.len() });
    }

    let price = parse_number(line, "price", fields[3])?;
    let rating = parse_number(line, "rating", fields[8])?;

    Ok(RoomListing {
        id: fields[0].to_string(),
        hotel_name: fields[1].to_string(),
        room_type: fields[2].to_string(),
        price,
        currency: fields[4].to_string(),
        description: fields[5].to_string(),
        amenities: fields[6].split(';').map(str::to_string).collect(),
        provider: fields[7].to_string(),
        rating,
        location: fields[9].to_string(),
        availability: fields[10].trim() == "true",
    })
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<f64, DatasetError> {
    value.trim().parse().map_err(|_| DatasetError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_dataset, DatasetError};

    const SAMPLE: &str = "\
id,hotelName,roomType,price,currency,description,amenities,provider,rating,location,availability
r1,Grand Plaza Hotel,Deluxe King Room,120,USD,Spacious room with city view,Free WiFi;Pool;Gym,Booking.com,4.5,Paris,true
r2,Budget Stay,Standard Double,75,USD,Clean and comfortable,Free WiFi,Hotels.com,3.8,Paris,false
";

    #[test]
    fn rows_parse_with_split_amenities() {
        let listings = parse_dataset(SAMPLE).expect("sample parses");
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].hotel_name, "Grand Plaza Hotel");
        assert_eq!(listings[0].price, 120.0);
        assert_eq!(listings[0].amenities, vec!["Free WiFi", "Pool", "Gym"]);
        assert!(listings[0].availability);

        assert_eq!(listings[1].rating, 3.8);
        assert!(!listings[1].availability);
    }

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let listings = parse_dataset(
            "id,hotelName,roomType,price,currency,description,amenities,provider,rating,location,availability\n\n",
        )
        .expect("empty body parses");
        assert!(listings.is_empty());
    }

    #[test]
    fn short_rows_are_rejected_with_position() {
        let raw = format!("{SAMPLE}r3,Missing Fields\n");
        let error = parse_dataset(&raw).expect_err("short row rejected");
        assert!(matches!(error, DatasetError::FieldCount { line: 4, found: 2 }));
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let raw = "\
id,hotelName,roomType,price,currency,description,amenities,provider,rating,location,availability
r1,Grand Plaza,King,expensive,USD,desc,WiFi,Booking.com,4.5,Paris,true
";
        let error = parse_dataset(raw).expect_err("bad price rejected");
        assert!(matches!(error, DatasetError::InvalidField { field: "price", .. }));
    }
}
