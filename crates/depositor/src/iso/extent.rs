//! Geographic, temporal and resolution extents.
//!
//! Zenodo only understands point locations and simple date ranges. Anything
//! richer (real bounding boxes, raw period boundaries, resolutions) is
//! preserved as HTML note text so nothing from the record is silently lost.

use super::*;

/// Place label used for points, ISO bounding boxes carry no name.
pub const MISSING_PLACE: &str = "Missing Name";

/// Line terminator for note text, which Zenodo renders as HTML.
pub const NOTE_BREAK: &str = "<br>";

/// Sentinel for an open-ended period.
const NOW: &str = "now";

/// Date-time layout used when substituting the current time for [`NOW`].
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reduces every bounding box to a point where possible.
///
/// Degenerate boxes (west equals east and south equals north) become a
/// [`Location`]. Every box, degenerate or not, also contributes a note line
/// with its four edges. Boxes missing an edge are skipped.
pub fn simplify_geographic_extents(document: &Document) -> (Vec<Location>, String) {
  let mut points = Vec::new();
  let mut notes = String::new();

  for bounding_box in document.select(DocumentField::GeographicExtent.path()) {
    let edges = [
      ContactField::WestBound,
      ContactField::EastBound,
      ContactField::SouthBound,
      ContactField::NorthBound,
    ]
    .map(|edge| bounding_box.text(edge.path()));
    let [Some(west), Some(east), Some(south), Some(north)] = &edges else {
      warn!("Skipping bounding box with missing edges: {:?}", edges);
      continue;
    };

    let parsed = [west, east, south, north].map(|edge| edge.parse::<f64>());
    let [Ok(west_value), Ok(east_value), Ok(south_value), Ok(north_value)] = parsed else {
      warn!("Skipping bounding box with non-numeric edges: {west}, {east}, {south}, {north}");
      continue;
    };

    if west_value == east_value && south_value == north_value {
      debug!("Bounding box collapses to point ({south_value}, {west_value})");
      points.push(Location {
        lat:   south_value,
        lon:   west_value,
        place: MISSING_PLACE.to_string(),
      });
    }

    notes.push_str(&format!(
      "Bounding box: west {west}, east {east}, south {south}, north {north}{NOTE_BREAK}"
    ));
  }

  (points, notes)
}

/// Drops the time component of an ISO 8601 date-time.
///
/// Strings without a `T` separator are returned unchanged.
pub fn truncate_to_date(date_time: &str) -> &str {
  date_time.split_once('T').map_or(date_time, |(date, _)| date)
}

/// Reduces every temporal extent with both ends to a date range.
///
/// An end of `now` (any case) is replaced by the given time before truncation. GML's
/// `indeterminatePosition="now"` on an empty end position counts as the same
/// sentinel. Extents missing either end produce neither a range nor a note.
pub fn simplify_temporal_extents(
  document: &Document,
  now: NaiveDateTime,
) -> (Vec<DateRange>, String) {
  let mut ranges = Vec::new();
  let mut notes = String::new();

  for extent in document.select(DocumentField::TemporalExtent.path()) {
    let begin = extent.text(ContactField::ExtentBegin.path());
    let end = extent.first(ContactField::ExtentEnd.path()).and_then(|position| {
      position.value().or_else(|| position.attribute("indeterminatePosition")).map(str::to_string)
    });
    let (Some(begin), Some(end)) = (begin, end) else {
      debug!("Skipping temporal extent without both ends");
      continue;
    };

    notes.push_str(&format!("Temporal extent: {begin} to {end}{NOTE_BREAK}"));

    let end = if end.trim().eq_ignore_ascii_case(NOW) {
      now.format(DATE_TIME_FORMAT).to_string()
    } else {
      end
    };

    ranges.push(DateRange {
      start:      truncate_to_date(&begin).to_string(),
      end:        truncate_to_date(&end).to_string(),
      range_type: DateType::Valid,
    });
  }

  (ranges, notes)
}

/// Describes every spatial resolution as a note line.
///
/// A blank line follows the block when at least one resolution was found.
pub fn simplify_spatial_resolutions(document: &Document) -> String {
  let mut notes = String::new();

  for distance in document.select(DocumentField::SpatialResolution.path()) {
    let Some(value) = distance.value() else {
      continue;
    };
    match distance.attribute("uom") {
      Some(unit) => notes.push_str(&format!("Spatial resolution: {value} {unit}{NOTE_BREAK}")),
      None => notes.push_str(&format!("Spatial resolution: {value}{NOTE_BREAK}")),
    }
  }

  if !notes.is_empty() {
    notes.push_str(NOTE_BREAK);
  }
  notes
}
