use super::*;
use crate::virtual_machine::assembler::assemble_source;
use crate::virtual_machine::frame::Frame;

fn run_vm(source: &str) -> VM {
    let asm = assemble_source(source).expect("assembly failed");
    let mut vm = VM::new();
    vm.run_program(&asm.program).expect("vm run failed");
    vm
}

fn run_err(source: &str) -> (VM, VMError) {
    let asm = assemble_source(source).expect("assembly failed");
    let mut vm = VM::new();
    let err = vm.run_program(&asm.program).unwrap_err();
    (vm, err)
}

fn int(v: i64) -> Value {
    Value::Int(v)
}

#[test]
fn fresh_engine_is_empty() {
    let vm = VM::new();
    assert!(vm.stack().is_empty());
    assert_eq!(vm.memory().len(), MEMORY_SIZE);
    assert!(vm.memory().iter().all(Value::is_empty));
    assert_eq!(vm.executed(), 0);
}

#[test]
fn load_const_pushes() {
    let vm = run_vm("LOAD_CONST 63 5\nLOAD_CONST 63 8191");
    assert_eq!(vm.stack(), &[int(5), int(8191)]);
    assert_eq!(vm.executed(), 2);
}

#[test]
fn max_stores_larger_and_drains_stack() {
    let vm = run_vm("LOAD_CONST 63 5\nLOAD_CONST 63 9\nMAX 144 0");
    assert_eq!(vm.cell(0).unwrap(), int(9));
    assert!(vm.stack().is_empty());
}

#[test]
fn max_is_order_independent() {
    let vm = run_vm("LOAD_CONST 63 9\nLOAD_CONST 63 5\nMAX 144 1");
    assert_eq!(vm.cell(1).unwrap(), int(9));
}

#[test]
fn max_only_consumes_top_two() {
    let vm = run_vm("LOAD_CONST 63 1\nLOAD_CONST 63 2\nLOAD_CONST 63 3\nMAX 144 10");
    assert_eq!(vm.cell(10).unwrap(), int(3));
    assert_eq!(vm.stack(), &[int(1)]);
}

#[test]
fn max_with_one_value_is_skipped() {
    let vm = run_vm("LOAD_CONST 63 4\nMAX 144 2");
    assert_eq!(vm.cell(2).unwrap(), Value::Empty);
    assert_eq!(vm.stack(), &[int(4)]);
    assert_eq!(vm.skipped(), 1);
    assert_eq!(vm.executed(), 2);
}

#[test]
fn max_prefers_integer_over_empty() {
    // READ_MEMORY of an untouched cell pushes Empty
    let vm = run_vm("READ_MEMORY 32 50\nLOAD_CONST 63 0\nMAX 144 3");
    assert_eq!(vm.cell(3).unwrap(), int(0));
}

#[test]
fn write_memory_pops_into_cell() {
    let vm = run_vm("LOAD_CONST 63 42\nWRITE_MEMORY 97 1023");
    assert_eq!(vm.cell(1023).unwrap(), int(42));
    assert!(vm.stack().is_empty());
}

#[test]
fn write_memory_on_empty_stack_is_noop() {
    let mut vm = VM::new();
    let outcome = vm.step(Instruction::new(Opcode::WriteMemory, 3)).unwrap();
    assert_eq!(outcome, StepOutcome::Skipped);
    assert_eq!(vm.cell(3).unwrap(), Value::Empty);
    assert_eq!(vm.skipped(), 1);
}

#[test]
fn write_memory_keeps_earlier_value_when_skipped() {
    let vm = run_vm("LOAD_CONST 63 7\nWRITE_MEMORY 97 3\nWRITE_MEMORY 97 3");
    assert_eq!(vm.cell(3).unwrap(), int(7));
}

#[test]
fn read_memory_moves_value_to_stack() {
    let vm = run_vm("LOAD_CONST 63 11\nWRITE_MEMORY 97 8\nREAD_MEMORY 32 8");
    assert_eq!(vm.stack(), &[int(11)]);
    assert_eq!(vm.cell(8).unwrap(), Value::Empty);
}

#[test]
fn read_memory_on_untouched_cell() {
    let vm = run_vm("READ_MEMORY 32 7");
    assert_eq!(vm.stack(), &[Value::Empty]);
    assert_eq!(vm.cell(7).unwrap(), Value::Empty);
}

#[test]
fn copy_through_memory() {
    let vm = run_vm(
        "LOAD_CONST 63 100\n\
         WRITE_MEMORY 97 0\n\
         READ_MEMORY 32 0\n\
         WRITE_MEMORY 97 1",
    );
    assert_eq!(vm.cell(0).unwrap(), Value::Empty);
    assert_eq!(vm.cell(1).unwrap(), int(100));
}

#[test]
fn read_memory_invalid_address() {
    let (vm, err) = run_err("READ_MEMORY 32 1024");
    assert_eq!(
        err,
        VMError::InvalidAddress {
            address: 1024,
            size: MEMORY_SIZE
        }
    );
    assert!(vm.stack().is_empty());
}

#[test]
fn write_memory_invalid_address_leaves_state() {
    let mut vm = VM::new();
    vm.step(Instruction::new(Opcode::LoadConst, 1)).unwrap();
    let err = vm
        .step(Instruction::new(Opcode::WriteMemory, u32::MAX))
        .unwrap_err();
    assert!(matches!(err, VMError::InvalidAddress { address: u32::MAX, .. }));
    assert_eq!(vm.stack(), &[int(1)]);
    assert!(vm.memory().iter().all(Value::is_empty));
}

#[test]
fn write_memory_invalid_address_fails_even_with_empty_stack() {
    let mut vm = VM::new();
    assert!(matches!(
        vm.step(Instruction::new(Opcode::WriteMemory, 5000)),
        Err(VMError::InvalidAddress { address: 5000, .. })
    ));
}

#[test]
fn max_invalid_address_leaves_state() {
    let (vm, err) = run_err("LOAD_CONST 63 1\nLOAD_CONST 63 2\nMAX 144 2000");
    assert!(matches!(err, VMError::InvalidAddress { address: 2000, .. }));
    assert_eq!(vm.stack(), &[int(1), int(2)]);
    assert!(vm.memory().iter().all(Value::is_empty));
}

#[test]
fn error_keeps_prior_mutations() {
    let (vm, err) = run_err("LOAD_CONST 63 6\nWRITE_MEMORY 97 4\nREAD_MEMORY 32 4096\nLOAD_CONST 63 1");
    assert!(matches!(err, VMError::InvalidAddress { .. }));
    assert_eq!(vm.cell(4).unwrap(), int(6));
    // nothing after the failing instruction ran
    assert!(vm.stack().is_empty());
    assert_eq!(vm.executed(), 2);
}

#[test]
fn malformed_frame_aborts_before_execution() {
    let mut frames = assemble_source("LOAD_CONST 63 1\nWRITE_MEMORY 97 0")
        .unwrap()
        .program
        .frames;
    frames.push(Frame::from_array([0x01, 0, 0, 0, 0]));
    let mut vm = VM::new();
    let err = vm.run_program(&Program::new(frames)).unwrap_err();
    assert_eq!(err, VMError::MalformedFrame { opcode: 0x01 });
    assert_eq!(vm.executed(), 0);
    assert_eq!(vm.cell(0).unwrap(), Value::Empty);
}

#[test]
fn runs_from_raw_bytes() {
    let bytes = [
        0x3F, 0x0A, 0x00, 0x00, 0x00, // LOAD_CONST 10
        0x3F, 0x6E, 0x01, 0x00, 0x00, // LOAD_CONST 366
        0x90, 0x7F, 0x03, 0x00, 0x00, // MAX 895
    ];
    let program = Program::from_bytes(&bytes).unwrap();
    let mut vm = VM::new();
    vm.run_program(&program).unwrap();
    assert_eq!(vm.cell(895).unwrap(), int(366));
}

#[test]
fn export_fresh_memory() {
    let vm = VM::new();
    let snap = vm.export(0, MEMORY_SIZE).unwrap();
    assert_eq!(snap.start_address, 0);
    assert_eq!(snap.length, MEMORY_SIZE);
    assert_eq!(snap.data.len(), MEMORY_SIZE);
    assert!(snap.data.iter().all(Value::is_empty));
    assert!(!snap.is_empty());
}

#[test]
fn export_window_contents() {
    let vm = run_vm("LOAD_CONST 63 3\nWRITE_MEMORY 97 11\nLOAD_CONST 63 4\nWRITE_MEMORY 97 13");
    let snap = vm.export(10, 5).unwrap();
    assert_eq!(
        snap.data,
        vec![Value::Empty, int(3), Value::Empty, int(4), Value::Empty]
    );
}

#[test]
fn export_bounds() {
    let vm = VM::new();
    assert_eq!(
        vm.export(1000, 100).unwrap_err(),
        VMError::RangeOutOfBounds {
            start: 1000,
            length: 100,
            size: MEMORY_SIZE
        }
    );
    assert!(vm.export(1000, 24).is_ok());
    assert!(vm.export(usize::MAX, 2).is_err());
    let empty = vm.export(MEMORY_SIZE, 0).unwrap();
    assert!(empty.is_empty());
    assert!(empty.data.is_empty());
}

#[test]
fn export_does_not_clear_cells() {
    let vm = run_vm("LOAD_CONST 63 8\nWRITE_MEMORY 97 0");
    vm.export(0, 1).unwrap();
    assert_eq!(vm.cell(0).unwrap(), int(8));
}

#[test]
fn cell_rejects_bad_address() {
    assert!(matches!(
        VM::new().cell(1024),
        Err(VMError::InvalidAddress { address: 1024, .. })
    ));
}
