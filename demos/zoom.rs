//! Draw a small map in geographic coordinates, zoom into it and save as PNG
//!
//! Usage: zoom [-c config.json] [-u units_per_cm] [-r degrees] <output.png>
use coordcanvas::*;
use std::{env, fs, sync::Arc};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    output_file: String,
    config: CanvasConfig,
    units: Option<Scalar>,
    rotate: Scalar,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            output_file: String::new(),
            config: CanvasConfig::default().with_size(720, 360),
            units: None,
            rotate: 0.0,
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "zoom".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-c" => {
                    let file = args.next().ok_or("-c requires argument")?;
                    result.config = CanvasConfig::from_json(&fs::read_to_string(file)?)?;
                }
                "-u" => {
                    let units = args.next().ok_or("-u requires argument")?;
                    result.units = Some(units.parse()?);
                }
                "-r" => {
                    let degrees = args.next().ok_or("-r requires argument")?;
                    result.rotate = degrees.parse()?;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.output_file = arg,
                        _ => return Err("unexpected positional argment".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!("Draw a map in geographic coordinates and zoom into it");
            eprintln!("\nUSAGE:");
            eprintln!("    {} [-c config.json] [-u units] [-r degrees] <output.png>", cmd);
            eprintln!("\nARGS:");
            eprintln!("    -c <config.json>   canvas configuration");
            eprintln!("    -u <units>         zoom to coordinate units per centimetre");
            eprintln!("    -r <degrees>       rotate after zoom");
            eprintln!("    <output.png>       output file");
            std::process::exit(1);
        }
        Ok(result)
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let mut canvas = Canvas::from_config(&args.config)?;
    canvas.geographic_space()?;
    canvas.clear();

    // graticule
    let grid = LineStyle::new(RGBA::new(128, 128, 128, 255), "0.2%min");
    for lon in (-180..=180).step_by(30) {
        let lon = lon as Scalar;
        canvas.draw_line(&[(lon, -90.0), (lon, 90.0)], &grid)?;
    }
    for lat in (-90..=90).step_by(30) {
        let lat = lat as Scalar;
        canvas.draw_line(&[(-180.0, lat), (180.0, lat)], &grid)?;
    }

    // land with a lake
    let land = ShapeStyle::default()
        .with_fill(Some(RGBA::new(90, 160, 90, 255)))
        .with_outline(Some(RGBA::BLACK), "0.15%min");
    canvas.draw_polygon(
        &[(-20.0, -35.0), (50.0, -35.0), (55.0, 30.0), (10.0, 37.0), (-17.0, 15.0)],
        &[vec![(20.0, -5.0), (30.0, -5.0), (30.0, 5.0), (20.0, 5.0)]],
        &land,
    )?;
    canvas.draw_line(
        &[(-75.0, 45.0), (-40.0, 55.0), (-10.0, 50.0), (5.0, 60.0)],
        &LineStyle::new(RGBA::new(40, 70, 200, 255), "0.4%min").with_smooth(true),
    )?;

    // cities
    let city = ShapeStyle::default().with_size("0.8%min");
    canvas.draw_circle((2.35, 48.86), &city)?;
    canvas.draw_box((-0.13, 51.51), &city)?;
    canvas.draw_triangle((13.40, 52.52), &city)?;
    canvas.draw_pie((37.62, 55.75), 0.0, 270.0, &city)?;
    let star: SymbolFn = Arc::new(|center: Point, width: Scalar, _: Scalar| {
        let points = (0..10).map(|index| {
            let radius = if index % 2 == 0 { width / 2.0 } else { width / 5.0 };
            let angle = (index as Scalar * 36.0 - 90.0).to_radians();
            center + Point::new(radius * angle.cos(), radius * angle.sin())
        });
        Path::builder().polygon(points).build()
    });
    canvas.draw_symbol((12.50, 41.90), &Symbol::Custom(star), &city)?;

    // zoom on europe
    canvas.zoom_bbox(-30.0, 20.0, 60.0, 70.0, Some(Conform::Fit))?;
    if let Some(units) = args.units {
        canvas.zoom_units(units, Some(Point::new(15.0, 45.0)))?;
    }
    if args.rotate != 0.0 {
        canvas.rotate(args.rotate)?;
    }
    tracing::debug!(
        "[zoom:bbox] {:?} units/cm: {}",
        canvas.coordspace_bbox(),
        canvas.coordspace_units()
    );
    tracing::debug!(
        "[zoom:distance] paris to berlin: {}",
        canvas.measure_dist((2.35, 48.86), (13.40, 52.52))
    );

    canvas.save_png(&args.output_file)?;
    Ok(())
}
