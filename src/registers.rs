// src/registers.rs
//
// Register addresses are the raw 6-bit values (0x00..=0x3F). The SPI address
// byte is built from them by the register layer in `rfid_rc522`.

// Page 0: Command and Status
pub const COMMAND_REG: u8 = 0x01;         // Starts and stops command execution
pub const COM_IEN_REG: u8 = 0x02;         // Communication Interrupt Enable Register
pub const DIV_IEN_REG: u8 = 0x03;         // DivIrq interrupt Enable Register
pub const COM_IRQ_REG: u8 = 0x04;         // Interrupt request bits
pub const DIV_IRQ_REG: u8 = 0x05;         // Set bits to signal internal events
pub const ERROR_REG: u8 = 0x06;           // Error bits showing the error status of the last command
pub const STATUS1_REG: u8 = 0x07;         // Communication status bits
pub const STATUS2_REG: u8 = 0x08;         // Receiver and transmitter status bits
pub const FIFO_DATA_REG: u8 = 0x09;       // FIFO data input/output
pub const FIFO_LEVEL_REG: u8 = 0x0A;      // Number of bytes in the FIFO buffer
pub const WATER_LEVEL_REG: u8 = 0x0B;     // Level for FIFO underflow and overflow warning
pub const CONTROL_REG: u8 = 0x0C;         // Miscellaneous control bits
pub const BIT_FRAMING_REG: u8 = 0x0D;     // Adjustments for bit-oriented frames
pub const COLL_REG: u8 = 0x0E;            // Collision detection

// Page 1: Command
pub const MODE_REG: u8 = 0x11;            // Defines general modes for transmitting and receiving
pub const TX_MODE_REG: u8 = 0x12;         // Defines transmission data rate and framing
pub const RX_MODE_REG: u8 = 0x13;         // Defines reception data rate and framing
pub const TX_CONTROL_REG: u8 = 0x14;      // Controls the logical behavior of the antenna driver pins TX1 and TX2
pub const TX_ASK_REG: u8 = 0x15;          // Controls the setting of the transmission modulation
pub const TX_SEL_REG: u8 = 0x16;          // Selects the internal sources for the antenna driver
pub const RX_SEL_REG: u8 = 0x17;          // Selects internal receiver settings
pub const RX_THRESHOLD_REG: u8 = 0x18;    // Selects thresholds for the bit decoder
pub const DEMOD_REG: u8 = 0x19;           // Defines demodulator settings
pub const MF_TX_REG: u8 = 0x1C;           // Controls some MIFARE communication transmit parameters
pub const MF_RX_REG: u8 = 0x1D;           // Controls some MIFARE communication receive parameters
pub const SERIAL_SPEED_REG: u8 = 0x1F;    // Selects the speed of the serial UART interface

// Page 2: Configuration
pub const CRC_RESULT_REG_M: u8 = 0x21;    // CRC calculation result, MSB
pub const CRC_RESULT_REG_L: u8 = 0x22;    // CRC calculation result, LSB
pub const MOD_WIDTH_REG: u8 = 0x24;       // Modulation width setting
pub const RF_CFG_REG: u8 = 0x26;          // Configures the receiver gain
pub const GS_N_REG: u8 = 0x27;            // Conductance of the antenna driver pins
pub const CW_GS_P_REG: u8 = 0x28;         // Conductance for the unmodulated carrier
pub const MOD_GS_P_REG: u8 = 0x29;        // Conductance for the modulation signal
pub const T_MODE_REG: u8 = 0x2A;          // Timer settings
pub const T_PRESCALER_REG: u8 = 0x2B;     // Timer prescaler value
pub const T_RELOAD_REG_H: u8 = 0x2C;      // 16-bit timer reload value (high byte)
pub const T_RELOAD_REG_L: u8 = 0x2D;      // 16-bit timer reload value (low byte)
pub const T_COUNTER_VAL_REG_H: u8 = 0x2E; // 16-bit timer value (high byte)
pub const T_COUNTER_VAL_REG_L: u8 = 0x2F; // 16-bit timer value (low byte)

// Page 3: Test
pub const TEST_SEL1_REG: u8 = 0x31;       // General test signal configuration
pub const TEST_SEL2_REG: u8 = 0x32;       // General test signal configuration and PRBS control
pub const TEST_PIN_EN_REG: u8 = 0x33;     // Enables certain pins to output test signals
pub const TEST_PIN_VALUE_REG: u8 = 0x34;  // Values for the test pins when used as I/O bus
pub const TEST_BUS_REG: u8 = 0x35;        // Shows the status of the internal test bus
pub const AUTO_TEST_REG: u8 = 0x36;       // Controls the self-test
pub const VERSION_REG: u8 = 0x37;         // Shows the software version
pub const ANALOG_TEST_REG: u8 = 0x38;     // Controls the pins AUX1 and AUX2
pub const TEST_DAC1_REG: u8 = 0x39;       // Test value for TestDAC1
pub const TEST_DAC2_REG: u8 = 0x3A;       // Test value for TestDAC2
pub const TEST_ADC_REG: u8 = 0x3B;        // Shows the value of ADC I and Q channels

/// Highest valid register address.
pub const MAX_REGISTER: u8 = 0x3F;

// ComIEnReg
pub const IRQ_INV: u8 = 0x80;             // Global enable (IRQ pin polarity) used alongside the enable mask

// ComIrqReg: Set1 TxIRq RxIRq IdleIRq HiAlertIRq LoAlertIRq ErrIRq TimerIRq
pub const SET1: u8 = 0x80;
pub const TX_IRQ: u8 = 0x40;
pub const RX_IRQ: u8 = 0x20;
pub const IDLE_IRQ: u8 = 0x10;
pub const HI_ALERT_IRQ: u8 = 0x08;
pub const LO_ALERT_IRQ: u8 = 0x04;
pub const ERR_IRQ: u8 = 0x02;
pub const TIMER_IRQ: u8 = 0x01;

// DivIrqReg
pub const CRC_IRQ: u8 = 0x04;

// ErrorReg: WrErr TempErr reserved BufferOvfl CollErr CRCErr ParityErr ProtocolErr
pub const BUFFER_OVFL_ERR: u8 = 0x10;
pub const COLL_ERR: u8 = 0x08;
pub const PARITY_ERR: u8 = 0x02;
pub const PROTOCOL_ERR: u8 = 0x01;
/// Errors that fail a command: buffer overflow, collision, parity and protocol.
pub const ERROR_MASK: u8 = BUFFER_OVFL_ERR | COLL_ERR | PARITY_ERR | PROTOCOL_ERR;

// Status2Reg
pub const MF_CRYPTO1_ON: u8 = 0x08;

// FIFOLevelReg
pub const FLUSH_BUFFER: u8 = 0x80;

// ControlReg
pub const RX_LAST_BITS: u8 = 0x07;

// BitFramingReg
pub const START_SEND: u8 = 0x80;
/// TxLastBits value for a 7-bit short frame (REQA/WUPA).
pub const SHORT_FRAME_BITS: u8 = 0x07;

// TxControlReg
pub const TX_RF_EN: u8 = 0x03;            // Tx1RFEn | Tx2RFEn
