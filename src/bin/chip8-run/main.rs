// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8-run: Runs a Chip-8 program with no window, then shows what it drew

use chip8vm::{error::Result, keypad::parse_keys, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let mut state = State::new(options)?;
    for result in &mut state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    state.cpu.screen().print_screen();
    state.cpu.dump();
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-delay rate.", default = "8", meta = "IPD")]
    pub speed: usize,
    #[options(short = "r", help = "Tick the timers once per frame, ignoring --speed.")]
    pub realtime: bool,
    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "IPF")]
    pub step: usize,
    #[options(help = "Enable performance benchmarking on stderr.")]
    pub perf: bool,

    #[options(short = "z", help = "Set vF to 0 after a bitwise operation.")]
    pub vfreset: bool,
    #[options(
        short = "c",
        help = "Use COSMAC VIP style DMA instructions, which leave I past the last register."
    )]
    pub memory: bool,
    #[options(
        short = "v",
        help = "Use COSMAC VIP style bit-shifts, which shift vY into vX."
    )]
    pub shift: bool,
    #[options(short = "w", help = "Wrap sprites around the edges of the screen.")]
    pub wrap: bool,

    #[options(help = "Hold keys down for the whole run, e.g. \"#a,w\".", meta = "KEYS")]
    pub keys: String,
    #[options(help = "Stop after this many frames.", default = "600", meta = "N")]
    pub frames: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

impl Arguments {
    /// Cycles per timer tick, or `None` when the timers follow the frame clock
    fn timer_rate(&self) -> Option<usize> {
        (!self.realtime).then_some(self.speed)
    }
}

#[derive(Debug)]
struct State {
    pub step: usize,
    pub rate: u64,
    pub perf: bool,
    pub frames: usize,
    pub cpu: CPU,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut state = State {
            step: options.step,
            rate: options.frame_rate.max(1),
            perf: options.perf,
            frames: options.frames,
            cpu: CPU::new(
                Dis::default(),
                Flags {
                    debug: options.debug,
                    pause: options.pause,
                    monotonic: options.timer_rate(),
                    ..Default::default()
                },
            ),
            ft: Instant::now(),
        };
        // Flip the state of the quirks
        state.cpu.flags.quirks.bin_ops ^= options.vfreset;
        state.cpu.flags.quirks.dma_inc ^= options.memory;
        state.cpu.flags.quirks.shift ^= options.shift;
        state.cpu.flags.quirks.screen_wrap ^= options.wrap;
        state.cpu.load_program_file(&options.file)?;
        state.cpu.load_key(parse_keys(&options.keys)?);
        Ok(state)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.cpu.flags.pause {
            let ticks = self.step;
            let time = Instant::now();
            self.cpu.multistep(ticks)?;
            // realtime timers run once per frame
            if self.cpu.flags.monotonic.is_none() {
                self.cpu.tick_timers();
            }
            if self.perf {
                let time = time.elapsed();
                let nspt = time.as_secs_f64() / ticks as f64;
                eprintln!(
                    "{ticks},\t{time:.05?},\t{:.4} nspt,\t{} ipf,\t{} mips",
                    nspt * 1_000_000_000.0,
                    ((1.0 / self.rate as f64) / nspt).trunc(),
                    (1.0 / nspt).trunc() / 1_000_000.0,
                );
            }
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame's worth of instructions, until out of frames
    fn next(&mut self) -> Option<Self::Item> {
        self.frames = self.frames.checked_sub(1)?;
        self.wait_for_next_frame();
        if let Err(e) = self.tick_cpu() {
            return Some(Err(e));
        }
        if self.cpu.flags.debug && self.cpu.sound_active() {
            eprintln!("{}", "beep".yellow());
        }
        Some(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::parse_args_default(args).expect("Arguments should parse")
    }

    #[test]
    fn default_timer_rate_matches_library() {
        assert_eq!(Flags::default().monotonic, parse(&["rom.ch8"]).timer_rate());
    }
    #[test]
    fn speed_sets_timer_rate() {
        assert_eq!(Some(12), parse(&["--speed", "12", "rom.ch8"]).timer_rate());
    }
    #[test]
    fn realtime_disables_timer_rate() {
        assert_eq!(None, parse(&["-r", "rom.ch8"]).timer_rate());
    }
}
