use argh::FromArgs;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use planefx::image::{ops, Image, ImageSize, Plane};
use planefx::recipes::{
    bernstein, gauss, gpa, gps, guided, mandelbrot, planes::map_all_planes, retinex, sbr, tv,
    wiener, xdog,
};

#[derive(FromArgs)]
/// Apply a filter recipe to an 8-bit grayscale image.
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// path to a JSON file with the recipe parameters
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Gpa(GpaCmd),
    Gauss(GaussCmd),
    Ssr(SsrCmd),
    Wiener2(Wiener2Cmd),
    Tv(TvCmd),
    Bernstein(BernsteinCmd),
    Xdog(XdogCmd),
    Sbr(SbrCmd),
    Detail(DetailCmd),
    Gps(GpsCmd),
    Mandelbrot(MandelbrotCmd),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "gpa")]
/// Gaussian-polynomial approximation of the bilateral filter.
struct GpaCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "gauss")]
/// Gaussian blur.
struct GaussCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "ssr")]
/// Single-scale retinex.
struct SsrCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "wiener2")]
/// Adaptive Wiener denoising.
struct Wiener2Cmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "tv")]
/// Total variation denoising.
struct TvCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "bernstein")]
/// Bernstein mean curvature filter.
struct BernsteinCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "xdog")]
/// eXtended difference of Gaussians.
struct XdogCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "sbr")]
/// Sharpening detail mask.
struct SbrCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "detail")]
/// Detail enhancement by reverse guided filtering.
struct DetailCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "gps")]
/// Display the power spectrum.
struct GpsCmd {}

#[derive(FromArgs)]
#[argh(subcommand, name = "mandelbrot")]
/// Render the Mandelbrot or a Julia set.
struct MandelbrotCmd {
    /// width of the rendered image
    #[argh(option, default = "640")]
    width: usize,

    /// height of the rendered image
    #[argh(option, default = "480")]
    height: usize,
}

fn load_config<T: DeserializeOwned + Default>(
    path: Option<&Path>,
) -> Result<T, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(T::default()),
    }
}

fn read_gray(path: &Path) -> Result<Image<u8, 1>, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_luma8();
    let (w, h) = img.dimensions();
    let size = ImageSize {
        width: w as usize,
        height: h as usize,
    };
    Ok(Image::new(size, img.into_vec())?)
}

fn write_gray(path: &Path, img: &Image<u8, 1>) -> Result<(), Box<dyn std::error::Error>> {
    image::save_buffer(
        path,
        img.as_slice(),
        img.width() as u32,
        img.height() as u32,
        image::ColorType::L8,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();
    let config = args.config.as_deref();

    if let Command::Mandelbrot(cmd) = &args.command {
        let cfg: mandelbrot::MandelbrotConfig = load_config(config)?;
        let size = ImageSize {
            width: cmd.width,
            height: cmd.height,
        };

        let mut plane = Plane::<f32>::from_size_val(size, 0.0)?;
        mandelbrot::mandelbrot(&mut plane, &cfg)?;

        let mut out = Image::<u8, 1>::from_size_val(size, 0)?;
        ops::from_unit_f32(&plane, &mut out, 8)?;
        write_gray(&args.output, &out)?;

        log::info!("wrote {:?}", args.output);
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .ok_or("missing input image, pass it with -i")?;
    let src = read_gray(input)?;
    let mut dst = src.like(0);
    log::info!("read {:?} with size {:?}", input, src.size());

    match &args.command {
        Command::Gpa(_) => {
            let cfg: gpa::GpaConfig = load_config(config)?;
            gpa::gpa(&src, &mut dst, &cfg)?;
        }
        Command::Gauss(_) => {
            let cfg: gauss::GaussConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| gauss::gauss(p, &cfg))?;
        }
        Command::Ssr(_) => {
            let cfg: retinex::SsrConfig = load_config(config)?;
            retinex::ssr_image(&src, &mut dst, 8, &cfg)?;
        }
        Command::Wiener2(_) => {
            let cfg: wiener::WienerConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| wiener::wiener2(p, &cfg))?;
        }
        Command::Tv(_) => {
            let cfg: tv::TvConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| tv::tv(p, None, &cfg))?;
        }
        Command::Bernstein(_) => {
            let cfg: bernstein::BernsteinConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| bernstein::bernstein_filter(p, &cfg))?;
        }
        Command::Xdog(_) => {
            let cfg: xdog::XdogConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| xdog::xdog(p, &cfg))?;
        }
        Command::Sbr(_) => {
            let cfg: sbr::SbrConfig = load_config(config)?;
            sbr::sbr_detail_image(&src, &mut dst, 8, &cfg)?;
        }
        Command::Detail(_) => {
            let cfg: guided::DetailConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| {
                guided::detail_enhancement(p, None, &cfg)
            })?;
        }
        Command::Gps(_) => {
            let cfg: gps::GpsConfig = load_config(config)?;
            map_all_planes(&src, &mut dst, 8, |p| gps::gps(p, &cfg))?;
        }
        Command::Mandelbrot(_) => return Err("mandelbrot does not take an input image".into()),
    }

    write_gray(&args.output, &dst)?;
    log::info!("wrote {:?}", args.output);

    Ok(())
}
