//! Runs small Chip-8 programs through chip8vm's public API

use chip8vm::prelude::*;

/// Assembles a list of instruction words into a program image
fn program(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn setup_environment(words: &[u16]) -> CPU {
    let mut cpu = CPU::default();
    cpu.load_program(&program(words))
        .expect("Test program should fit in memory");
    cpu
}

fn lit(cpu: &CPU) -> usize {
    cpu.screen().as_slice().iter().filter(|&&p| p != 0).count()
}

mod load {
    use super::*;
    #[test]
    fn font_is_installed() {
        let cpu = CPU::default();
        let start = FONT_ADDR as usize;
        assert_eq!(&FONT[..], &cpu.mem().as_slice()[start..start + FONT.len()]);
    }

    #[test]
    fn program_lands_at_0x200() {
        let cpu = setup_environment(&[0xa22a, 0x600c]);
        assert_eq!(0xa22a, cpu.mem().read_word(PROGRAM_ADDR));
        assert_eq!(0x600c, cpu.mem().read_word(PROGRAM_ADDR + 2));
        assert_eq!(PROGRAM_ADDR, cpu.pc());
    }

    #[test]
    fn largest_program_fits() {
        let mut cpu = CPU::default();
        cpu.load_program(&[0xff; PROGRAM_CAPACITY])
            .expect("A program of exactly the capacity should fit");
        assert_eq!(0xff, cpu.mem().read(0xfff));
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut cpu = CPU::default();
        let before = cpu.mem().clone();
        let err = cpu
            .load_program(&[0xff; PROGRAM_CAPACITY + 1])
            .expect_err("Program should not fit");
        assert!(matches!(
            err,
            Error::ProgramTooLarge {
                len: 0xe01,
                capacity: 0xe00
            }
        ));
        assert_eq!(&before, cpu.mem());
    }

    #[test]
    fn missing_file() {
        let mut cpu = CPU::default();
        let err = cpu
            .load_program_file("this/file/does/not/exist.ch8")
            .expect_err("Loading a missing file should fail");
        assert!(matches!(err, Error::IoError(_)));
    }
}

mod programs {
    use super::*;
    #[test]
    fn countdown_loop() {
        // v0 = 5; loop { v0 -= 1 (add #ff); if v0 != 0 jmp loop }; halt
        let mut cpu = setup_environment(&[
            0x6005, // 200: mov #05, v0
            0x70ff, // 202: add #ff, v0
            0x3000, // 204: se  #00, v0
            0x1202, // 206: jmp 202
            0x1208, // 208: jmp 208
        ]);
        cpu.multistep(64).unwrap();
        assert_eq!(0, cpu.v()[0]);
        assert_eq!(0x208, cpu.pc());
    }

    #[test]
    fn subroutine() {
        let mut cpu = setup_environment(&[
            0x2206, // 200: call 206
            0x6102, // 202: mov #02, v1
            0x1204, // 204: jmp 204
            0x6001, // 206: mov #01, v0
            0x00ee, // 208: ret
        ]);
        cpu.multistep(4).unwrap();
        assert_eq!(&[1u8, 2], &cpu.v()[..2]);
        assert_eq!(0x204, cpu.pc());
        assert_eq!(0, cpu.sp());
    }

    #[test]
    fn runaway_recursion_faults() {
        let mut cpu = setup_environment(&[0x2200]);
        for _ in 0..16 {
            cpu.do_cycle().unwrap();
        }
        let err = cpu.do_cycle().expect_err("Stack should overflow");
        assert!(matches!(err, Error::StackOverflow { pc: 0x200 }));
        assert_eq!(16, cpu.sp());
        assert_eq!(0x200, cpu.pc());
    }

    #[test]
    fn bare_return_faults() {
        let mut cpu = setup_environment(&[0x00ee]);
        let err = cpu.do_cycle().expect_err("Stack should underflow");
        assert!(matches!(err, Error::StackUnderflow { pc: 0x200 }));
        assert_eq!(0x200, cpu.pc());
    }

    #[test]
    fn register_dump_and_restore() {
        let mut cpu = setup_environment(&[
            0xa300, // mov $300, I
            0x60de, // mov #de, v0
            0x61ad, // mov #ad, v1
            0x62be, // mov #be, v2
            0xf255, // dmao v2
            0x6000, // mov #00, v0
            0x6100, // mov #00, v1
            0x6200, // mov #00, v2
            0xf265, // dmai v2
        ]);
        cpu.multistep(9).unwrap();
        assert_eq!(&[0xde_u8, 0xad, 0xbe], &cpu.v()[..3]);
        assert_eq!(&[0xde_u8, 0xad, 0xbe], &cpu.mem().as_slice()[0x300..0x303]);
        assert_eq!(0x300, cpu.i());
    }

    #[test]
    fn bcd() {
        let mut cpu = setup_environment(&[
            0x60fe, // mov  #fe, v0
            0xa400, // mov  $400, I
            0xf033, // bcd  v0, &I
        ]);
        cpu.multistep(3).unwrap();
        assert_eq!(&[2u8, 5, 4], &cpu.mem().as_slice()[0x400..0x403]);
    }

    #[test]
    fn carry_and_borrow() {
        let mut cpu = setup_environment(&[
            0x60f0, // mov #f0, v0
            0x6120, // mov #20, v1
            0x8014, // add v1, v0
        ]);
        cpu.multistep(3).unwrap();
        assert_eq!(0x10, cpu.v()[0]);
        assert_eq!(1, cpu.v()[0xf]);

        let mut cpu = setup_environment(&[
            0x6010, // mov #10, v0
            0x6120, // mov #20, v1
            0x8015, // sub v1, v0
        ]);
        cpu.multistep(3).unwrap();
        assert_eq!(0xf0, cpu.v()[0]);
        assert_eq!(0, cpu.v()[0xf]);
    }

    #[test]
    fn machine_code_calls_are_ignored() {
        let mut cpu = setup_environment(&[0x0123, 0x0fff, 0x6001]);
        cpu.multistep(3).unwrap();
        assert_eq!(1, cpu.v()[0]);
        assert_eq!(0x206, cpu.pc());
    }
}

mod display {
    use super::*;
    #[test]
    fn draw_glyph_then_erase() {
        let mut cpu = setup_environment(&[
            0x6007, // mov  #07, v0
            0xf029, // font v0, I
            0x6a08, // mov  #08, vA
            0x6b04, // mov  #04, vB
            0xdab5, // draw #5, vA, vB
            0xdab5, // draw #5, vA, vB
        ]);
        cpu.multistep(5).unwrap();
        assert!(cpu.draw_flag());
        assert_eq!(0, cpu.v()[0xf]);
        // 7: f0 10 20 40 40
        assert_eq!(4 + 1 + 1 + 1 + 1, lit(&cpu));
        assert_eq!(Some(true), cpu.screen().get(8, 4));
        assert_eq!(Some(true), cpu.screen().get(11, 5));

        cpu.do_cycle().unwrap();
        assert_eq!(1, cpu.v()[0xf]);
        assert_eq!(0, lit(&cpu));
    }

    #[test]
    fn clear_and_load_screen() {
        let mut cpu = setup_environment(&[
            0xf029, // font v0, I
            0xd005, // draw #5, v0, v0
            0x00e0, // cls
        ]);
        cpu.multistep(2).unwrap();
        let mut buffer = [0; SCREEN_SIZE];
        cpu.load_screen(&mut buffer);
        // 0: f0 90 90 90 f0
        assert_eq!(&[1u8, 1, 1, 1, 0], &buffer[..5]);
        assert_eq!(&[1u8, 0, 0, 1, 0], &buffer[SCREEN_WIDTH..SCREEN_WIDTH + 5]);

        cpu.do_cycle().unwrap();
        assert!(cpu.take_draw_flag());
        cpu.load_screen(&mut buffer);
        assert!(buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn rgb_buffer() {
        let mut cpu = setup_environment(&[
            0xa20a, // mov  $20a, I
            0xd001, // draw #1, v0, v0
            0x1204, // jmp  204
            0x0000,
            0x0000,
            0x8000, // 20a: sprite data
        ]);
        cpu.multistep(2).unwrap();
        let rgb = cpu.screen().to_rgb([0xff, 0xff, 0xff], [0x10, 0x20, 0x30]);
        assert_eq!(SCREEN_SIZE * 3, rgb.len());
        assert_eq!(&[0xff_u8, 0xff, 0xff, 0x10, 0x20, 0x30], &rgb[..6]);
    }
}

mod keypad {
    use super::*;
    #[test]
    fn wait_for_key() {
        let mut cpu = setup_environment(&[
            0xf30a, // waitk v3
            0x1202, // jmp 202
        ]);
        cpu.multistep(10).unwrap();
        assert_eq!(0x200, cpu.pc());
        assert!(cpu.flags.keypause);

        cpu.load_key(parse_keys("#c, #e").unwrap());
        cpu.do_cycle().unwrap();
        assert_eq!(0xc, cpu.v()[3]);
        assert_eq!(0x202, cpu.pc());
        assert!(!cpu.flags.keypause);
    }

    #[test]
    fn skip_on_key() {
        let mut cpu = setup_environment(&[
            0x6005, // mov #05, v0
            0xe09e, // sek v0
            0x6101, // mov #01, v1
            0xe0a1, // snek v0
            0x6201, // mov #01, v2
        ]);
        cpu.press(identify_key('w').unwrap()).unwrap();
        cpu.multistep(5).unwrap();
        // key 5 was down, so the first move was skipped, and the second one ran
        assert_eq!(&[5u8, 0, 1], &cpu.v()[..3]);
    }

    #[test]
    fn press_release() {
        let mut cpu = CPU::default();
        assert!(cpu.press(0xf).unwrap());
        assert!(!cpu.press(0xf).unwrap());
        assert!(cpu.keys()[0xf]);
        assert!(cpu.release(0xf).unwrap());
        assert!(!cpu.keys()[0xf]);
        assert!(matches!(cpu.press(0x10), Err(Error::InvalidKey { key: 0x10 })));
        assert!(cpu.release(0x10).is_err());
    }

    #[test]
    fn host_keys() {
        let layout = "1234qwerasdfzxcv";
        let expect = [
            0x1, 0x2, 0x3, 0xc, 0x4, 0x5, 0x6, 0xd, 0x7, 0x8, 0x9, 0xe, 0xa, 0x0, 0xb, 0xf,
        ];
        for (key, expect) in layout.chars().zip(expect) {
            assert_eq!(Some(expect), identify_key(key));
            assert_eq!(Some(expect), identify_key(key.to_ascii_uppercase()));
        }
        assert_eq!(None, identify_key('5'));
    }

    #[test]
    fn parse_key_lists() {
        assert_eq!([false; 16], parse_keys("").unwrap());
        let keys = parse_keys("1, #F,v").unwrap();
        assert!(keys[0x1] && keys[0xf]);
        assert_eq!(2, keys.iter().filter(|&&k| k).count());
        assert!(matches!(
            parse_keys("1, ww"),
            Err(Error::InvalidKeyName { name }) if name == "ww"
        ));
        assert!(parse_keys("#g").is_err());
    }
}

mod timers {
    use super::*;
    #[test]
    fn delay_set_by_program() {
        let mut cpu = setup_environment(&[
            0x6001, // mov #01, v0
            0xf015, // mov v0, DT
            0x1204, // jmp 204
        ]);
        cpu.multistep(7).unwrap();
        assert_eq!(1, cpu.delay());
        cpu.do_cycle().unwrap();
        assert_eq!(0, cpu.delay());
    }

    #[test]
    fn sound_runs_down() {
        let mut cpu = setup_environment(&[
            0x6003, // mov #03, v0
            0xf018, // mov v0, ST
            0x1204, // jmp 204
        ]);
        cpu.multistep(2).unwrap();
        assert!(cpu.sound_active());
        cpu.multistep(8 * 3).unwrap();
        assert_eq!(0, cpu.sound());
        assert!(!cpu.sound_active());
    }

    #[test]
    fn read_back_delay() {
        let mut cpu = setup_environment(&[
            0x6040, // mov #40, v0
            0xf015, // mov v0, DT
            0x1204, // jmp 204
        ]);
        cpu.flags.monotonic = None;
        cpu.multistep(100).unwrap();
        assert_eq!(0x40, cpu.delay());
        for _ in 0..0x10 {
            cpu.tick_timers();
        }
        assert_eq!(0x30, cpu.debug_info().delay);
    }
}

mod quirks {
    use super::*;
    #[test]
    fn vf_reset() {
        let mut cpu = setup_environment(&[
            0x6f01, // mov #01, vF
            0x8011, // or  v1, v0
        ]);
        cpu.flags.quirks.bin_ops = true;
        cpu.multistep(2).unwrap();
        assert_eq!(0, cpu.v()[0xf]);
    }

    #[test]
    fn all_on() {
        let mut cpu = setup_environment(&[
            0x6102, // mov #02, v1
            0x8016, // shr v1, v0
            0xa300, // mov $300, I
            0xf155, // dmao v1
        ]);
        cpu.flags.quirks = Quirks::from(true);
        cpu.multistep(4).unwrap();
        assert_eq!(1, cpu.v()[0]);
        assert_eq!(0x302, cpu.i());
    }
}

mod lifecycle {
    use super::*;
    #[test]
    fn initialize_between_programs() {
        let mut cpu = setup_environment(&[0x6a42, 0xa321, 0x2200]);
        cpu.multistep(3).unwrap();
        cpu.initialize();
        assert_eq!(CPU::default(), cpu);
    }

    #[test]
    fn paused() {
        let mut cpu = setup_environment(&[0x6a42]);
        cpu.flags.pause();
        cpu.multistep(1).unwrap();
        assert_eq!(0, cpu.v()[0xa]);
        cpu.flags.pause();
        cpu.multistep(1).unwrap();
        assert_eq!(0x42, cpu.v()[0xa]);
    }

    #[test]
    fn dump_doesnt_panic() {
        let mut cpu = setup_environment(&[0x6a42, 0x00e0]);
        cpu.flags.debug();
        cpu.multistep(2).unwrap();
        cpu.dump();
        cpu.screen().print_screen();
    }
}
