#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const LISTING_HEADER: &str = "id,log_price,property_type,room_type,amenities,accommodates,bathrooms,bed_type,cancellation_policy,cleaning_fee,city,description,first_review,host_has_profile_pic,host_identity_verified,host_response_rate,host_since,instant_bookable,last_review,latitude,longitude,name,neighbourhood,number_of_reviews,review_scores_rating,zipcode,bedrooms,beds";

/// Six listings covering a null percentage, an unparseable rating and
/// t/f flags.
pub const LISTING_ROWS: [&str; 6] = [
    "1,5.01,Apartment,Entire home/apt,{TV},3,1.0,Real Bed,strict,True,NYC,Cozy loft,2016-06-18,t,t,100%,2012-03-26,f,2016-07-18,40.69,-73.99,Loft,Williamsburg,2,100,11211,1,1",
    "2,5.13,Apartment,Entire home/apt,{Wifi},7,1.0,Real Bed,strict,True,NYC,Big flat,2017-08-05,t,f,,2017-06-19,t,2017-09-23,40.76,-73.98,Flat,Hell's Kitchen,6,93,10019,3,3",
    "3,4.98,Apartment,Entire home/apt,{TV},5,1.0,Real Bed,moderate,True,NYC,Near park,2017-04-30,t,t,80%,2016-10-25,t,2017-09-14,40.80,-73.94,Rooms,Harlem,10,92,10027,1,3",
    "4,6.62,House,Entire home/apt,{Kitchen},4,1.0,Real Bed,flexible,True,SF,Sunny house,,t,t,90%,2015-04-19,f,,37.77,-122.43,House,Lower Haight,0,n/a,94117,2,2",
    "5,4.74,Apartment,Entire home/apt,{Wifi},2,1.0,Real Bed,moderate,True,DC,Studio,2015-05-12,t,t,100%,2015-03-01,t,2017-01-22,38.93,-77.03,Studio,Columbia Heights,4,40,20009,0,1",
    "6,4.44,Apartment,Private room,{Heating},2,1.0,Real Bed,strict,True,SF,Quiet room,2017-08-27,t,t,100%,2017-06-07,t,2017-09-05,37.75,-122.42,Room,Mission District,3,100,94110,1,1",
];

/// Write `header` and `rows` as `name` in a fresh temp directory.
pub fn write_csv(name: &str, header: &str, rows: &[&str]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).expect("Failed to write csv");
    (dir, path)
}

/// The six-row listings file.
pub fn listings_csv() -> (TempDir, PathBuf) {
    write_csv("Airbnb_Data.csv", LISTING_HEADER, &LISTING_ROWS)
}
