mod event;

pub use event::{
    code_name, parse_input_event, HardwareEvent, ABS_PRESSURE, ABS_X, ABS_Y, BTN_TOOL_PEN,
    BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN, INPUT_EVENT_SIZE, SYN_REPORT,
};
