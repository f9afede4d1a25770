// SPDX-License-Identifier: BSD-2-Clause
// Command-line behavior modelled on the liblzf `lzf` utility.
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lzf_codec::{Codec, CodecConfig, DEFAULT_CHUNK_SIZE, Error, LzfCodec};

#[cfg(unix)]
use rustix::termios;
#[cfg(unix)]
use std::os::fd::AsFd;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Compress,
    Uncompress,
    Lzcat,
}

#[derive(Debug)]
struct Config {
    mode: Mode,
    force: bool,
    verbose: bool,
    chunk_size: usize,
    files: Vec<String>,
}

fn usage(rc: i32) -> ! {
    eprintln!();
    eprintln!("lzf: chunked LZF compression/decompression utility.");
    eprintln!();
    eprintln!("usage: lzf [-cdfhv] [-b size] [file ...]");
    eprintln!("       unlzf [file ...]");
    eprintln!("       lzcat [file ...]");
    eprintln!();
    eprintln!("-c --compress         compress");
    eprintln!("-d --decompress       decompress");
    eprintln!("-f --force            force overwrite of output file");
    eprintln!("-h --help             give this help");
    eprintln!("-v --verbose          verbose mode");
    eprintln!("-b # --chunk-size #   set chunk size (default {DEFAULT_CHUNK_SIZE})");
    eprintln!();
    std::process::exit(rc);
}

fn parse_u64_auto_radix(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(rest, 16).ok();
    }

    if s.len() > 1 && s.starts_with('0') {
        return u64::from_str_radix(&s[1..], 8).ok();
    }

    s.parse::<u64>().ok()
}

fn parse_chunk_size(s: &str) -> usize {
    match parse_u64_auto_radix(s) {
        Some(v) if v != 0 && v <= MAX_CHUNK_SIZE as u64 => v as usize,
        _ => DEFAULT_CHUNK_SIZE,
    }
}

fn program_name(args0: Option<&str>) -> &str {
    args0.unwrap_or("lzf").rsplit('/').next().unwrap_or("lzf")
}

fn parse_args(args: &[String]) -> Config {
    let imagename = program_name(args.first().map(String::as_str));

    let mut mode = if imagename.starts_with("un") || imagename.starts_with("de") {
        Mode::Uncompress
    } else {
        Mode::Compress
    };
    if imagename.contains("cat") {
        mode = Mode::Lzcat;
    }

    let mut force = false;
    let mut verbose = false;
    let mut chunk_size =
        env::var("LZF_CHUNK_SIZE").ok().map_or(DEFAULT_CHUNK_SIZE, |v| parse_chunk_size(&v));

    let mut i = 1usize;
    let mut files = Vec::new();
    while i < args.len() {
        let arg = &args[i];

        if arg == "--" {
            files.extend(args[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            files.push(arg.clone());
            i += 1;
            continue;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, value) = long.split_once('=').map_or((long, None), |(n, v)| (n, Some(v)));
            match name {
                "compress" => mode = Mode::Compress,
                "decompress" | "uncompress" => mode = Mode::Uncompress,
                "force" => force = true,
                "help" => usage(0),
                "verbose" => verbose = true,
                "chunk-size" => {
                    let val = if let Some(v) = value {
                        v
                    } else {
                        if i + 1 >= args.len() {
                            usage(1);
                        }
                        i += 1;
                        &args[i]
                    };
                    chunk_size = parse_chunk_size(val);
                }
                _ => usage(1),
            }
            i += 1;
            continue;
        }

        let mut chars = arg[1..].chars();
        while let Some(c) = chars.next() {
            match c {
                'c' => mode = Mode::Compress,
                'd' => mode = Mode::Uncompress,
                'f' => force = true,
                'h' => usage(0),
                'v' => verbose = true,
                'b' => {
                    let inline: String = chars.collect();
                    if inline.is_empty() {
                        if i + 1 >= args.len() {
                            usage(1);
                        }
                        i += 1;
                        chunk_size = parse_chunk_size(&args[i]);
                    } else {
                        chunk_size = parse_chunk_size(&inline);
                    }
                    break;
                }
                _ => usage(1),
            }
        }

        i += 1;
    }

    Config { mode, force, verbose, chunk_size, files }
}

#[cfg(unix)]
fn stdin_is_tty() -> bool {
    termios::isatty(io::stdin().as_fd())
}

#[cfg(not(unix))]
fn stdin_is_tty() -> bool {
    false
}

#[cfg(unix)]
fn stdout_is_tty() -> bool {
    termios::isatty(io::stdout().as_fd())
}

#[cfg(not(unix))]
fn stdout_is_tty() -> bool {
    false
}

fn compose_name(mode: Mode, input: &Path, extension: &str) -> Result<PathBuf, String> {
    let s = input.to_str().ok_or_else(|| format!("{}: invalid path", input.display()))?;
    match mode {
        Mode::Compress => Ok(PathBuf::from(format!("{s}.{extension}"))),
        Mode::Uncompress => s
            .strip_suffix(&format!(".{extension}"))
            .map(PathBuf::from)
            .ok_or_else(|| format!("{s}: unknown suffix")),
        Mode::Lzcat => Ok(PathBuf::new()),
    }
}

fn create_output(path: &Path, force: bool) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    if !force {
        opts.create_new(true);
    }
    opts.open(path)
}

fn run_codec(
    codec: &LzfCodec,
    mode: Mode,
    input: &mut dyn io::Read,
    output: &mut dyn Write,
) -> Result<u64, Error> {
    match mode {
        Mode::Compress => codec.compress_stream(input, output),
        Mode::Uncompress | Mode::Lzcat => codec.decompress_stream(input, output),
    }
}

fn report_error(imagename: &str, mode: Mode, err: &Error) {
    match err {
        Error::InvalidCompressedData => {
            eprintln!("{imagename}: decompress: invalid stream - data corrupted");
        }
        Error::Io(e) => eprintln!("{imagename}: {e}"),
        other if mode == Mode::Compress => eprintln!("{imagename}: compress failed: {other}"),
        other => eprintln!("{imagename}: {other}"),
    }
}

fn print_verbose(mode: Mode, src: &Path, dst: &Path, nr_read: u64, nr_written: u64) {
    let pct = match mode {
        Mode::Compress => {
            if nr_read == 0 {
                0.0
            } else {
                100.0 - (nr_written as f64 / (nr_read as f64 / 100.0))
            }
        }
        Mode::Uncompress | Mode::Lzcat => {
            if nr_written == 0 {
                0.0
            } else {
                100.0 - (nr_read as f64 / (nr_written as f64 / 100.0))
            }
        }
    };

    eprintln!("{}:  {:5.1}% -- replaced with {}", src.display(), pct, dst.display());
}

fn run_file(imagename: &str, codec: &LzfCodec, cfg: &Config, file: &str) -> i32 {
    let input = Path::new(file);

    let in_meta = match fs::symlink_metadata(input) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{imagename}: {}: {e}", input.display());
            return 1;
        }
    };

    if !in_meta.file_type().is_file() {
        eprintln!("{imagename}: {}: not a regular file.", input.display());
        return 1;
    }

    let mut in_file = match File::open(input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{imagename}: {}: {e}", input.display());
            return 1;
        }
    };

    if cfg.mode == Mode::Lzcat {
        let mut out_lock = io::stdout().lock();
        return match run_codec(codec, cfg.mode, &mut in_file, &mut out_lock) {
            Ok(_) => 0,
            Err(err) => {
                report_error(imagename, cfg.mode, &err);
                1
            }
        };
    }

    let out_path = match compose_name(cfg.mode, input, codec.file_extension()) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{imagename}: {msg}");
            return 1;
        }
    };

    let out_file = match create_output(&out_path, cfg.force) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{imagename}: {}: {e}", out_path.display());
            return 1;
        }
    };

    let mut writer = BufWriter::new(out_file);
    let nr_written = match run_codec(codec, cfg.mode, &mut in_file, &mut writer) {
        Ok(n) => n,
        Err(err) => {
            report_error(imagename, cfg.mode, &err);
            drop(writer);
            let _ = fs::remove_file(&out_path);
            return 1;
        }
    };
    drop(writer);

    #[cfg(unix)]
    {
        let mode = in_meta.permissions().mode();
        let _ = fs::set_permissions(&out_path, fs::Permissions::from_mode(mode));
    }

    if cfg.verbose {
        print_verbose(cfg.mode, input, &out_path, in_meta.len(), nr_written);
    }

    if let Err(e) = fs::remove_file(input) {
        eprintln!("{imagename}: {}: {e}", input.display());
        return 1;
    }

    0
}

fn run_stdio(imagename: &str, codec: &LzfCodec, cfg: &Config) -> i32 {
    if !cfg.force {
        if matches!(cfg.mode, Mode::Uncompress | Mode::Lzcat) && stdin_is_tty() {
            eprintln!(
                "{imagename}: compressed data not read from a terminal. Use -f to force decompression."
            );
            return 1;
        }
        if cfg.mode == Mode::Compress && stdout_is_tty() {
            eprintln!(
                "{imagename}: compressed data not written to a terminal. Use -f to force compression."
            );
            return 1;
        }
    }

    let mut in_lock = io::stdin().lock();
    let mut out_lock = io::stdout().lock();

    match run_codec(codec, cfg.mode, &mut in_lock, &mut out_lock) {
        Ok(_) => 0,
        Err(err) => {
            report_error(imagename, cfg.mode, &err);
            1
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let cfg = parse_args(&args);
    let imagename = program_name(args.first().map(String::as_str));

    let codec = match LzfCodec::new(CodecConfig::default().with_chunk_size(cfg.chunk_size)) {
        Ok(codec) => codec,
        Err(err) => {
            eprintln!("{imagename}: {err}");
            std::process::exit(1);
        }
    };

    let mut rc = 0i32;
    if cfg.files.is_empty() {
        rc |= run_stdio(imagename, &codec, &cfg);
    } else {
        for f in &cfg.files {
            rc |= run_file(imagename, &codec, &cfg, f);
        }
    }

    std::process::exit(if rc == 0 { 0 } else { 1 });
}
