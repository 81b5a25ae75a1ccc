use qtty::Seconds;
use taiepoch::{AlignOptions, EpochSeries};

fn main() -> taiepoch::Result<()> {
    let station = EpochSeries::from_utc_calendar(
        &[2016, 2016, 2017],
        &[12, 12, 1],
        &[31, 31, 1],
        &[23, 23, 0],
        &[59, 59, 0],
        &[59.0, 60.0, 0.0],
    )?;
    for diagnostic in &station.diagnostics {
        println!("note: {diagnostic:?}");
    }
    let station = station.into_value();
    for (epoch, leap) in station.iter().zip(station.is_leap_second()) {
        println!("{epoch}  leap={leap}");
    }

    let (week, sow) = station.gps_week_sow();
    println!("GPS week/SOW: {week:?} {sow:?}");

    let receiver = EpochSeries::from_gps_week_sow(&week[..1], &sow[..1])?;
    let common = station
        .intersect(&receiver, AlignOptions::with_rate(Seconds::new(1.0)))?
        .into_value();
    println!("common samples: {:?} / {:?}", common.first, common.second);

    for row in station.calendar_dates()?.into_value() {
        println!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:06.3}",
            row.year, row.month, row.day, row.hour, row.minute, row.second
        );
    }
    Ok(())
}
